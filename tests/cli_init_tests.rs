//! End-to-end tests for `villa-showcase init`.

mod fixtures;
use fixtures::*;

#[test]
fn test_init_seeds_default_categories() {
    let env = TestEnv::new();

    let output = env.run(&["init"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("✓ Created 4 default categories"));

    let result = stdout_json(&env.run(&["category", "list", "--json"]));
    let names: Vec<&str> = result["categories"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Summer Deals", "Italian Summer", "Winter Deals", "New Deals"]
    );
}

#[test]
fn test_init_is_idempotent() {
    let env = TestEnv::new();

    env.run(&["init"]);
    let output = env.run(&["init"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Categories already exist, skipping initialization."));

    let result = stdout_json(&env.run(&["category", "list", "--json"]));
    assert_eq!(result["count"], 4);
}

#[test]
fn test_init_skips_when_any_category_exists() {
    let env = TestEnv::new();
    env.run(&["category", "add", "--name", "Greek Islands"]);

    let output = env.run(&["init"]);

    assert_eq!(output.status.code(), Some(0));
    let result = stdout_json(&env.run(&["category", "list", "--json"]));
    assert_eq!(result["count"], 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_init_writes_platform_config_once() {
    let env = TestEnv::new();
    let config_file = env.config_home().join("VillaShowcase").join("config.toml");

    let output = env.run_with_config_home(&["init", "--write-config"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("✓ Wrote"));
    let written = std::fs::read_to_string(&config_file).expect("config should be written");
    assert!(written.contains("[carousel]"));

    std::fs::write(&config_file, "[server]\nport = 9000\n").unwrap();
    let output = env.run_with_config_home(&["init", "--write-config"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Config already exists"));
    assert_eq!(
        std::fs::read_to_string(&config_file).unwrap(),
        "[server]\nport = 9000\n"
    );
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();

    let output = env.run(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout(&output);
    for command in ["preview", "category", "item", "hero", "validate", "init"] {
        assert!(stdout.contains(command), "help should list `{command}`");
    }
}
