use figment::Jail;
use proctor_config::ProctorConfig;

#[test]
fn env_vars_override_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("PROCTOR_SIGNING__SECRET", "sk_from_env");
        jail.set_env("PROCTOR_ORACLE__TIMEOUT_SECS", "45");

        let config: ProctorConfig = ProctorConfig::figment().extract().expect("config loads");
        assert_eq!(config.signing.secret, "sk_from_env");
        assert_eq!(config.oracle.timeout_secs, 45);
        Ok(())
    });
}

#[test]
fn env_beats_local_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".proctor")?;
        jail.create_file(
            ".proctor/config.toml",
            r#"
            [signing]
            secret = "sk_from_toml"

            [storage]
            uploads_dir = "generated"
            "#,
        )?;
        jail.set_env("PROCTOR_SIGNING__SECRET", "sk_from_env");

        let config: ProctorConfig = ProctorConfig::figment().extract().expect("config loads");
        assert_eq!(config.signing.secret, "sk_from_env");
        // TOML still applies where env is silent
        assert_eq!(config.storage.uploads_dir, "generated");
        Ok(())
    });
}
