//! Per-file transform pipeline
//!
//! Parse, run one rewrite pass per configured library over a single shared
//! traversal, splice in the synthesized imports, print. Failures abort the
//! whole file; partial mutations are never written anywhere.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::debug;

use crate::{
    config::Config,
    parser, printer,
    transform::ModularizeImports,
    visit::{self, FileContext, Pass},
};

/// Transform one file's source text according to `config`. Libraries are
/// keyed by their configuration index; each gets an independent pass
/// instance with its own state.
pub fn transform_source(source: &str, config: &Config) -> Result<String> {
    let mut module = parser::parse_module(source)?;
    let mut passes = config
        .libraries
        .iter()
        .enumerate()
        .map(|(index, library)| ModularizeImports::from_config(library, index))
        .collect::<Result<Vec<_>>>()?;

    let mut cx = FileContext::new(&module);
    {
        let mut refs: Vec<&mut dyn Pass> = passes
            .iter_mut()
            .map(|pass| pass as &mut dyn Pass)
            .collect();
        visit::traverse(&mut module, &mut refs, &mut cx)?;
    }
    if !cx.injector.is_empty() {
        debug!("synthesized {} granular imports", cx.injector.len());
    }
    cx.injector.apply(&mut module);
    Ok(printer::print_module(&module))
}

/// Transform a file on disk, with diagnostics naming the file.
pub fn transform_file(input: &Path, config: &Config) -> Result<String> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    transform_source(&source, config)
        .with_context(|| format!("failed to transform {}", input.display()))
}
