use std::fs;

use modulize::{config::Config, orchestrator::transform_file};
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("modulize.toml");
    fs::write(
        &config_path,
        "[[libraries]]\nlibrary_name = \"ui-lib\"\nstyle = true\n",
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.libraries.len(), 1);
    assert!(config.libraries[0].style);
}

#[test]
fn test_load_missing_file_names_the_path() {
    let err = Config::load(std::path::Path::new("/nonexistent/modulize.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/modulize.toml"));
}

#[test]
#[serial]
fn test_discover_prefers_project_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("modulize.toml"),
        "[[libraries]]\nlibrary_name = \"project-lib\"\n",
    )
    .unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp_dir.path()).unwrap();
    let config = Config::discover(None);
    std::env::set_current_dir(original_dir).unwrap();

    let config = config.unwrap();
    assert_eq!(config.libraries.len(), 1);
    assert_eq!(config.libraries[0].library_name, "project-lib");
}

#[test]
#[serial]
#[allow(unsafe_code)]
fn test_discover_falls_back_to_user_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_home = temp_dir.path().join("xdg");
    fs::create_dir_all(config_home.join("modulize")).unwrap();
    fs::write(
        config_home.join("modulize").join("modulize.toml"),
        "[[libraries]]\nlibrary_name = \"user-lib\"\n",
    )
    .unwrap();
    let work = temp_dir.path().join("work");
    fs::create_dir_all(&work).unwrap();

    let original_dir = std::env::current_dir().unwrap();
    let original_xdg = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_current_dir(&work).unwrap();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", &config_home);
    }
    let config = Config::discover(None);
    unsafe {
        match &original_xdg {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
    std::env::set_current_dir(original_dir).unwrap();

    let config = config.unwrap();
    assert_eq!(config.libraries.len(), 1);
    assert_eq!(config.libraries[0].library_name, "user-lib");
}

#[test]
fn test_transform_file_reads_and_names_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("app.js");
    fs::write(&input, "import { Button } from 'ui-lib';\nuse(Button);\n").unwrap();

    let config = Config::from_toml_str("[[libraries]]\nlibrary_name = \"ui-lib\"\n").unwrap();
    let output = transform_file(&input, &config).unwrap();
    assert_eq!(
        output,
        "import _Button from 'ui-lib/lib/button';\nuse(_Button);\n"
    );

    let missing = temp_dir.path().join("missing.js");
    let err = transform_file(&missing, &config).unwrap_err();
    assert!(format!("{err:#}").contains("missing.js"));
}
