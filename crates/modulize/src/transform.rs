//! Aggregated-import rewriting pass
//!
//! One [`ModularizeImports`] instance targets one configured library for one
//! file. It scans the file's import declarations to learn which local names
//! originate from the targeted library, rewrites eligible identifier
//! references into references to injected per-component imports, and removes
//! the original aggregated imports at end of file.

use std::hash::BuildHasherDefault;

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use rustc_hash::FxHasher;

use crate::{
    ast::{
        CallExpr, ClassDecl, CondExpr, Expr, ImportDecl, ImportSpecifier, Module, NodeId,
        ReturnStmt, Stmt,
    },
    config::LibraryConfig,
    naming::{CaseStrategy, CustomName, join_path},
    scope::BindingKind,
    visit::{FileContext, Pass},
};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Resolved per-library options. Custom naming is a concrete value by the
/// time this struct exists; nothing is loaded or validated during traversal.
#[derive(Debug)]
pub struct Options {
    pub library_name: String,
    pub library_directory: String,
    pub style: bool,
    pub style_library_directory: Option<String>,
    pub case: CaseStrategy,
    pub file_name: Option<String>,
    pub custom_name: Option<CustomName>,
    pub custom_style_name: Option<CustomName>,
    pub transform_to_default_import: bool,
}

impl Options {
    /// Defaults matching the documented configuration surface.
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            library_directory: "lib".to_owned(),
            style: false,
            style_library_directory: None,
            case: CaseStrategy::KebabCase,
            file_name: None,
            custom_name: None,
            custom_style_name: None,
            transform_to_default_import: true,
        }
    }
}

/// A named import tracked for rewriting: the exported name it came in under
/// and the declaration that introduced it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TrackedBinding {
    imported: String,
    decl: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemovalStatus {
    Pending,
    Removed,
}

/// A declaration slated for deletion, with an explicit lifecycle so that
/// detaching twice is a checkable no-op rather than incidental pointer luck.
#[derive(Debug)]
struct RemovalEntry {
    decl: NodeId,
    status: RemovalStatus,
}

/// Binding tables and the pending-removal queue for one (file, library)
/// pair. Never shared between instances.
#[derive(Debug, Default)]
struct TransformState {
    /// Local name -> tracked named import. Rewrite candidates.
    tracked: FxIndexMap<String, TrackedBinding>,
    /// Locals bound via default/namespace specifiers of the targeted
    /// library: observed so they are never confused with tracked names, but
    /// never rewritten.
    namespace_locals: FxIndexSet<String>,
    removals: Vec<RemovalEntry>,
}

/// The rewrite pass for one configured library.
#[derive(Debug)]
pub struct ModularizeImports {
    options: Options,
    /// Instance key; distinguishes concurrently configured libraries in logs.
    index: usize,
    state: TransformState,
}

impl ModularizeImports {
    pub fn new(options: Options, index: usize) -> Self {
        Self {
            options,
            index,
            state: TransformState::default(),
        }
    }

    /// Resolve a [`LibraryConfig`] into a pass instance. Configuration
    /// errors (conflicting casing flags, invalid custom-name template)
    /// surface here, before any traversal starts.
    pub fn from_config(config: &LibraryConfig, index: usize) -> Result<Self> {
        Ok(Self::new(config.resolve()?, index))
    }

    pub fn library_name(&self) -> &str {
        &self.options.library_name
    }

    /// Component path for an exported name: a custom name wins outright,
    /// otherwise the cased name under the library directory, with an
    /// optional literal file-name leaf.
    fn component_path(&self, imported: &str) -> String {
        if let Some(custom) = &self.options.custom_name {
            if let Some(path) = custom.resolve(imported) {
                return join_path(&[&self.options.library_name, &path]);
            }
        }
        let leaf = self.options.case.apply(imported);
        match &self.options.file_name {
            Some(file_name) => join_path(&[
                &self.options.library_name,
                &self.options.library_directory,
                &leaf,
                file_name,
            ]),
            None => join_path(&[
                &self.options.library_name,
                &self.options.library_directory,
                &leaf,
            ]),
        }
    }

    /// Style path: custom style name verbatim under the library root, else
    /// `<lib>/<style dir>/<cased>/style`.
    fn style_path(&self, imported: &str) -> String {
        if let Some(custom) = &self.options.custom_style_name {
            if let Some(path) = custom.resolve(imported) {
                return join_path(&[&self.options.library_name, &path]);
            }
        }
        let dir = self
            .options
            .style_library_directory
            .as_deref()
            .unwrap_or(&self.options.library_directory);
        let leaf = self.options.case.apply(imported);
        join_path(&[&self.options.library_name, dir, &leaf, "style"])
    }

    /// Request the injected reference for a tracked component, plus its
    /// style import when enabled.
    fn inject_component(&self, imported: &str, cx: &mut FileContext) -> Result<Expr> {
        let path = self.component_path(imported);
        let reference = if self.options.transform_to_default_import {
            cx.injector.inject_default(imported, &path)?
        } else {
            cx.injector.inject_named(imported, &path)?
        };
        if self.options.style {
            cx.injector.inject_side_effect(&self.style_path(imported))?;
        }
        Ok(reference)
    }

    /// Rewrite one candidate slot in place when it holds a bare identifier
    /// that resolves to a tracked import binding. Same-named locals and
    /// parameters resolve to `BindingKind::Local` and are left untouched.
    fn rewrite_slot(&mut self, slot: &mut Expr, cx: &mut FileContext) -> Result<()> {
        let Some(name) = slot.as_ident() else {
            return Ok(());
        };
        let Some(binding) = self.state.tracked.get(name) else {
            return Ok(());
        };
        match cx.scopes.resolve(name) {
            Some(BindingKind::Import { decl }) if decl == binding.decl => {}
            _ => {
                trace!("[{}] `{name}` is shadowed or unresolved, skipping", self.index);
                return Ok(());
            }
        }
        let imported = binding.imported.clone();
        let reference = self.inject_component(&imported, cx).with_context(|| {
            format!(
                "failed to inject import of '{imported}' from '{}'",
                self.options.library_name
            )
        })?;
        trace!("[{}] rewrote `{name}` -> {reference:?}", self.index);
        *slot = reference;
        Ok(())
    }
}

impl Pass for ModularizeImports {
    /// Import Scanner: populate binding tables and enqueue the declaration
    /// for removal. Never mutates the tree.
    fn import_declaration(&mut self, decl: &ImportDecl, cx: &mut FileContext) -> Result<()> {
        if cx.is_detached(decl.node_id) {
            trace!("[{}] import {} already detached, skipping", self.index, decl.node_id);
            return Ok(());
        }
        if decl.source != self.options.library_name {
            return Ok(());
        }
        let mut any_named = false;
        for specifier in &decl.specifiers {
            match specifier {
                ImportSpecifier::Named { imported, local } => {
                    any_named = true;
                    self.state.namespace_locals.shift_remove(local);
                    self.state.tracked.insert(
                        local.clone(),
                        TrackedBinding {
                            imported: imported.clone(),
                            decl: decl.node_id,
                        },
                    );
                }
                ImportSpecifier::Default { local } | ImportSpecifier::Namespace { local } => {
                    self.state.tracked.shift_remove(local);
                    self.state.namespace_locals.insert(local.clone());
                }
            }
        }
        // A declaration binding only a default/namespace object stays: its
        // references are never rewritten, so removing it would break them.
        if any_named || decl.specifiers.is_empty() {
            debug!(
                "[{}] scanned aggregated import of '{}' ({} specifiers)",
                self.index,
                decl.source,
                decl.specifiers.len()
            );
            self.state.removals.push(RemovalEntry {
                decl: decl.node_id,
                status: RemovalStatus::Pending,
            });
        }
        Ok(())
    }

    /// Usage Rewriter: call arguments only; member access and invocation of
    /// the callee itself are out of scope.
    fn call_expression(&mut self, call: &mut CallExpr, cx: &mut FileContext) -> Result<()> {
        for argument in &mut call.arguments {
            self.rewrite_slot(argument, cx)?;
        }
        Ok(())
    }

    fn conditional_expression(&mut self, cond: &mut CondExpr, cx: &mut FileContext) -> Result<()> {
        self.rewrite_slot(&mut cond.test, cx)?;
        self.rewrite_slot(&mut cond.consequent, cx)?;
        self.rewrite_slot(&mut cond.alternate, cx)
    }

    fn return_statement(&mut self, ret: &mut ReturnStmt, cx: &mut FileContext) -> Result<()> {
        match &mut ret.argument {
            Some(argument) => self.rewrite_slot(argument, cx),
            None => Ok(()),
        }
    }

    fn class_declaration(&mut self, class: &mut ClassDecl, cx: &mut FileContext) -> Result<()> {
        match &mut class.super_class {
            Some(super_class) => self.rewrite_slot(super_class, cx),
            None => Ok(()),
        }
    }

    /// Cleanup Pass: detach every enqueued declaration still pending, in
    /// enqueue order. Detaching an already-detached declaration is a no-op,
    /// so running this twice (or across instances sharing a declaration)
    /// yields the same tree.
    fn program_exit(&mut self, module: &mut Module, cx: &mut FileContext) -> Result<()> {
        for entry in &mut self.state.removals {
            if entry.status == RemovalStatus::Removed {
                continue;
            }
            let before = module.body.len();
            module
                .body
                .retain(|stmt| !matches!(stmt, Stmt::Import(decl) if decl.node_id == entry.decl));
            if module.body.len() < before {
                debug!("[{}] removed aggregated import {}", self.index, entry.decl);
            }
            cx.mark_detached(entry.decl);
            entry.status = RemovalStatus::Removed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{parser::parse_module, printer::print_module, visit::traverse};

    use super::*;

    fn run_with_options(source: &str, options: Options) -> String {
        let mut module = parse_module(source).expect("Failed to parse");
        let mut pass = ModularizeImports::new(options, 0);
        let mut cx = FileContext::new(&module);
        traverse(&mut module, &mut [&mut pass], &mut cx).expect("traverse failed");
        cx.injector.apply(&mut module);
        print_module(&module)
    }

    fn run(source: &str) -> String {
        run_with_options(source, Options::new("ui-lib"))
    }

    #[test]
    fn test_return_argument_is_rewritten_and_import_removed() {
        let output = run(
            "import { Button, Icon } from 'ui-lib';\nfunction f() { return Button; }",
        );
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nfunction f() {\n  return _Button;\n}\n"
        );
    }

    #[test]
    fn test_style_enabled_adds_side_effect_import() {
        let mut options = Options::new("ui-lib");
        options.style = true;
        options.style_library_directory = Some("lib".to_owned());
        let output = run_with_options(
            "import { Button } from 'ui-lib';\nfunction f() { return Button; }",
            options,
        );
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nimport 'ui-lib/lib/button/style';\nfunction f() {\n  return _Button;\n}\n"
        );
    }

    #[test]
    fn test_shadowed_local_is_not_rewritten() {
        let output = run(
            "import { Button } from 'ui-lib';\nfunction g() { const Button = 5; return Button; }\nfunction f() { return Button; }",
        );
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nfunction g() {\n  const Button = 5;\n  return Button;\n}\nfunction f() {\n  return _Button;\n}\n"
        );
    }

    #[test]
    fn test_parameter_shadow_is_not_rewritten() {
        let output = run("import { Icon } from 'ui-lib';\nfunction g(Icon) { return Icon; }");
        assert_eq!(output, "function g(Icon) {\n  return Icon;\n}\n");
    }

    #[test]
    fn test_namespace_import_is_left_alone() {
        let source = "import * as UI from 'ui-lib';\nfunction f() { return UI; }";
        let output = run(source);
        assert_eq!(
            output,
            "import * as UI from 'ui-lib';\nfunction f() {\n  return UI;\n}\n"
        );
    }

    #[test]
    fn test_call_arguments_are_rewritten() {
        let output = run("import { Button } from 'ui-lib';\nrender(Button, other);");
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nrender(_Button, other);\n"
        );
    }

    #[test]
    fn test_conditional_slots_are_rewritten() {
        let output = run(
            "import { Button, Icon } from 'ui-lib';\nconst x = flag ? Button : Icon;",
        );
        // Declarator initializers are not a covered position, but the
        // conditional inside one is.
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nimport _Icon from 'ui-lib/lib/icon';\nconst x = flag ? _Button : _Icon;\n"
        );
    }

    #[test]
    fn test_class_heritage_is_rewritten() {
        let output = run(
            "import { Component } from 'ui-lib';\nclass App extends Component { render() { return null; } }",
        );
        assert_eq!(
            output,
            "import _Component from 'ui-lib/lib/component';\nclass App extends _Component {\n  render() {\n    return null;\n  }\n}\n"
        );
    }

    #[test]
    fn test_uncovered_positions_are_preserved() {
        let output = run(
            "import { Button } from 'ui-lib';\nconst direct = Button;\nconst arr = [Button];\nnew Button();\nuse(Button);",
        );
        // Only the call argument is a covered position; the initializer,
        // array element, and `new` argument list keep the original name.
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nconst direct = Button;\nconst arr = [Button];\nnew Button();\nuse(_Button);\n"
        );
    }

    #[test]
    fn test_two_usages_dedup_to_one_import() {
        let output = run(
            "import { Button } from 'ui-lib';\nfunction a() { return Button; }\nfunction b() { return Button; }",
        );
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nfunction a() {\n  return _Button;\n}\nfunction b() {\n  return _Button;\n}\n"
        );
    }

    #[test]
    fn test_snake_case_strategy() {
        let mut options = Options::new("ui-lib");
        options.case = CaseStrategy::SnakeCase;
        let output = run_with_options(
            "import { TimePicker } from 'ui-lib';\nuse(TimePicker);",
            options,
        );
        assert_eq!(
            output,
            "import _TimePicker from 'ui-lib/lib/time_picker';\nuse(_TimePicker);\n"
        );
    }

    #[test]
    fn test_named_import_mode() {
        let mut options = Options::new("ui-lib");
        options.transform_to_default_import = false;
        let output = run_with_options("import { Button } from 'ui-lib';\nuse(Button);", options);
        assert_eq!(
            output,
            "import { Button as _Button } from 'ui-lib/lib/button';\nuse(_Button);\n"
        );
    }

    #[test]
    fn test_file_name_leaf_override() {
        let mut options = Options::new("ui-lib");
        options.file_name = Some("index.js".to_owned());
        let output = run_with_options("import { Button } from 'ui-lib';\nuse(Button);", options);
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button/index.js';\nuse(_Button);\n"
        );
    }

    #[test]
    fn test_custom_name_wins_outright() {
        let mut options = Options::new("ui-lib");
        options.custom_name = Some(CustomName::template("es/{name}/entry").expect("template"));
        options.case = CaseStrategy::Preserve;
        let output = run_with_options("import { Button } from 'ui-lib';\nuse(Button);", options);
        assert_eq!(
            output,
            "import _Button from 'ui-lib/es/Button/entry';\nuse(_Button);\n"
        );
    }

    #[test]
    fn test_aliased_named_import_uses_exported_name() {
        let output = run("import { Button as Btn } from 'ui-lib';\nuse(Btn);");
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nuse(_Button);\n"
        );
    }

    #[test]
    fn test_other_library_imports_are_untouched() {
        let output = run(
            "import { Other } from 'another-lib';\nimport { Button } from 'ui-lib';\nuse(Button, Other);",
        );
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nimport { Other } from 'another-lib';\nuse(_Button, Other);\n"
        );
    }

    #[test]
    fn test_stale_declaration_is_skipped() {
        let mut module =
            parse_module("import { Button } from 'ui-lib';\nuse(Button);").expect("Failed to parse");
        let decl_id = match &module.body[0] {
            Stmt::Import(decl) => decl.node_id,
            other => panic!("Expected import, got {other:?}"),
        };
        let mut pass = ModularizeImports::new(Options::new("ui-lib"), 0);
        let mut cx = FileContext::new(&module);
        cx.mark_detached(decl_id);
        traverse(&mut module, &mut [&mut pass], &mut cx).expect("traverse failed");
        cx.injector.apply(&mut module);
        // The scanner never saw the declaration, so nothing was tracked,
        // rewritten, or removed.
        assert_eq!(
            print_module(&module),
            "import { Button } from 'ui-lib';\nuse(Button);\n"
        );
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut module = parse_module("import { Button } from 'ui-lib';\nuse(Button);")
            .expect("Failed to parse");
        let mut pass = ModularizeImports::new(Options::new("ui-lib"), 0);
        let mut cx = FileContext::new(&module);
        traverse(&mut module, &mut [&mut pass], &mut cx).expect("traverse failed");

        let after_first = module.clone();
        pass.program_exit(&mut module, &mut cx).expect("second cleanup failed");
        assert_eq!(module, after_first);
    }

    #[test]
    fn test_repeated_aggregated_imports_are_all_scanned() {
        let output = run(
            "import { Button } from 'ui-lib';\nimport { Icon } from 'ui-lib';\nuse(Button, Icon);",
        );
        assert_eq!(
            output,
            "import _Button from 'ui-lib/lib/button';\nimport _Icon from 'ui-lib/lib/icon';\nuse(_Button, _Icon);\n"
        );
    }
}
