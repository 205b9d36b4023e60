/* 📖 # Registry tests against the real filesystem

The unit tests next to each module run on MockPal. These run the same scenarios through
RealPal on a temporary directory tree, so path concatenation, separators and directory
listing behave as they will on disk.
*/

#[cfg(test)]
mod real_filesystem_tests {
    use std::fs;
    use std::io::{Read, Write};
    use std::path::Path;

    use searchfs_base::{PalHandle, RealPal};
    use tempfile::TempDir;

    use crate::{MountStatus, SearchPathFlags, SearchPathRegistry, parse_config};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// `data/` and `mods/` under a temp dir, both holding `config.cfg`.
    fn setup() -> (TempDir, String, String) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path();
        write(root, "data/config.cfg", "data");
        write(root, "data/sounds/a.wav", "");
        write(root, "data/sounds/b.wav", "");
        write(root, "mods/config.cfg", "mods");
        write(root, "mods/sounds/c.wav", "");
        let data = format!("{}/data", root.display());
        let mods = format!("{}/mods/", root.display());
        (temp_dir, data, mods)
    }

    fn registry() -> SearchPathRegistry {
        SearchPathRegistry::new(PalHandle::new(RealPal::new()))
    }

    #[test]
    fn test_mount_same_directory_twice() {
        let (_temp_dir, data, _mods) = setup();
        let mut registry = registry();

        assert_eq!(registry.mount_directory(&data, SearchPathFlags::empty()), MountStatus::Added);
        assert_eq!(
            registry.mount_directory(&format!("{}/", data), SearchPathFlags::empty()),
            MountStatus::AlreadyLoaded
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_later_mount_overrides() {
        let (_temp_dir, data, mods) = setup();
        let mut registry = registry();
        registry.mount_directory(&data, SearchPathFlags::empty());
        registry.mount_directory(&mods, SearchPathFlags::empty());

        let mut content = String::new();
        registry
            .open_file("config.cfg", "r")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "mods");
        assert_eq!(registry.find_file("config.cfg").unwrap().base_path, mods);
        assert!(registry.file_time("sounds/a.wav").is_some());
    }

    #[test]
    fn test_directories_are_not_found_as_files() {
        let (_temp_dir, data, mods) = setup();
        let mut registry = registry();
        registry.mount_directory(&data, SearchPathFlags::empty());
        registry.mount_directory(&mods, SearchPathFlags::empty());

        assert!(registry.find_file("sounds").is_none());
        assert!(!registry.file_exists("SOUNDS"));
        assert!(registry.open_file("sounds", "r").is_err());
    }

    #[test]
    fn test_search_across_directories() {
        let (_temp_dir, data, mods) = setup();
        let mut registry = registry();
        registry.mount_directory(&data, SearchPathFlags::empty());
        registry.mount_directory(&mods, SearchPathFlags::empty());

        let results = registry.search("sounds/*.wav", false, false).unwrap();
        assert_eq!(results.as_slice(), ["sounds/a.wav", "sounds/b.wav", "sounds/c.wav"]);

        let results = registry.search("*", false, false).unwrap();
        assert_eq!(results.as_slice(), ["config.cfg", "sounds"]);
    }

    #[test]
    fn test_write_lands_in_write_directory() {
        let (temp_dir, data, mods) = setup();
        let mut registry = registry();
        registry.mount_directory(&data, SearchPathFlags::empty());
        registry.mount_directory(&mods, SearchPathFlags::NOWRITE);

        let mut handle = registry.open_file("autoexec.cfg", "w").unwrap();
        handle.write_all(b"echo hi").unwrap();
        drop(handle);

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("data/autoexec.cfg")).unwrap(),
            "echo hi"
        );
        assert!(!temp_dir.path().join("mods/autoexec.cfg").exists());
    }

    #[test]
    fn test_config_mounts_in_file_order() {
        let (_temp_dir, data, mods) = setup();
        let config = parse_config(&format!(
            "[[mount]]\npath = '{}'\n[[mount]]\npath = '{}'\nflags = ['gamedir']\n",
            data, mods
        ))
        .unwrap();
        let mut registry = registry();
        registry.mount_config(&config).unwrap();

        let results = registry.search("sounds/*", false, true).unwrap();
        assert_eq!(results.as_slice(), ["sounds/c.wav"]);
    }
}
