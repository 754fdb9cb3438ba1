#[cfg(test)]
mod verify {
    use std::fs;

    use markshow::profile::{self, defaults, ConfigError, Target};

    #[test]
    fn missing_file_is_created_with_defaults() {
        let directory = tempfile::tempdir().expect("Failed to create config directory");
        let path = directory
            .path()
            .join("nested")
            .join("profiles.json");

        let store = profile::load_from(&path).unwrap();
        assert_eq!(store, defaults::builtin());
        assert!(path.exists());

        // and loading it back gives the same thing
        let again = profile::load_from(&path).unwrap();
        assert_eq!(again, store);
    }

    #[test]
    fn saved_changes_survive_reload() {
        let directory = tempfile::tempdir().expect("Failed to create config directory");
        let path = directory
            .path()
            .join("profiles.json");

        let mut store = defaults::builtin();
        store.default_profile = "pdf".to_string();
        if let Some(terminal) = store
            .profiles
            .get_mut("terminal")
        {
            terminal
                .image
                .width_percent = 0.4;
        }
        profile::save_to(&store, &path).unwrap();

        let loaded = profile::load_from(&path).unwrap();
        assert_eq!(loaded.default_profile, "pdf");
        assert_eq!(
            loaded
                .resolve(Some("terminal"))
                .unwrap()
                .image
                .width_percent,
            0.4
        );
        assert_eq!(
            loaded
                .resolve(None)
                .unwrap()
                .target,
            Target::PaginatedDocument
        );

        // no temporary file left next to it
        let names: Vec<_> = fs::read_dir(directory.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn partial_file_is_merged_over_defaults() {
        let directory = tempfile::tempdir().expect("Failed to create config directory");
        let path = directory
            .path()
            .join("profiles.json");
        fs::write(
            &path,
            r#"{"profiles": {"docx": {"table": {"word_wrap": false}}}}"#,
        )
        .unwrap();

        let store = profile::load_from(&path).unwrap();
        let docx = store
            .resolve(Some("docx"))
            .unwrap();
        assert!(!docx
            .table
            .word_wrap);
        assert_eq!(docx.table.width_percent, defaults::docx().table.width_percent);
        assert_eq!(store.names(), defaults::builtin().names());
    }

    #[test]
    fn corrupt_file_is_reported_not_replaced() {
        let directory = tempfile::tempdir().expect("Failed to create config directory");
        let path = directory
            .path()
            .join("profiles.json");
        fs::write(&path, "{ \"profiles\": ").unwrap();

        let result = profile::load_from(&path);
        match result {
            Err(ConfigError::Corrupt { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a corrupt configuration, got {:?}", other),
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "{ \"profiles\": ");
    }
}
