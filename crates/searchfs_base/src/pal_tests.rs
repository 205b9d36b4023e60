/* 📖 # PAL cross-implementation tests

The engine must behave the same whether it runs against RealPal or MockPal, so the
behaviors it relies on are checked against both: listing shape and ordering, case-insensitive
collapsing, and existence checks on concatenated paths.
*/

#[cfg(test)]
mod pal_contract_tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::pal::{MockPal, Pal, PalHandle, RealPal};

    /// Builds the same small tree in a MockPal and on disk; returns (base path, pal) pairs.
    fn both_pals() -> (TempDir, Vec<(String, PalHandle)>) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("sounds")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("config.cfg"), "").unwrap();
        fs::write(root.join("sounds/b.wav"), "").unwrap();
        fs::write(root.join("sounds/a.wav"), "").unwrap();

        let mock = MockPal::new();
        mock.add_file("/game/config.cfg", b"".to_vec());
        mock.add_file("/game/sounds/b.wav", b"".to_vec());
        mock.add_file("/game/sounds/a.wav", b"".to_vec());
        mock.add_directory("/game/empty");

        let real_base = format!("{}/", root.display());
        let pals = vec![
            (real_base, PalHandle::new(RealPal::new())),
            ("/game/".to_string(), PalHandle::new(mock)),
        ];
        (temp_dir, pals)
    }

    #[test]
    fn test_listing_is_sorted_and_flat() {
        let (_temp_dir, pals) = both_pals();
        for (base, pal) in pals {
            let listing = pal.list_directory(&base, false);
            assert_eq!(listing.entries(), ["config.cfg", "empty", "sounds"], "{pal:?}");

            let listing = pal.list_directory(&format!("{base}sounds/"), false);
            assert_eq!(listing.entries(), ["a.wav", "b.wav"], "{pal:?}");
        }
    }

    #[test]
    fn test_empty_and_missing_directories() {
        let (_temp_dir, pals) = both_pals();
        for (base, pal) in pals {
            assert!(pal.list_directory(&format!("{base}empty/"), false).is_empty());
            assert!(pal.list_directory(&format!("{base}missing/"), true).is_empty());
        }
    }

    #[test]
    fn test_existence_of_concatenated_paths() {
        let (_temp_dir, pals) = both_pals();
        for (base, pal) in pals {
            assert!(pal.file_exists(&format!("{base}sounds/a.wav"), false));
            assert!(pal.file_exists(&format!("{base}SOUNDS/A.WAV"), true));
            assert!(!pal.file_exists(&format!("{base}sounds/c.wav"), true));
        }
    }

    #[test]
    fn test_read_file_to_string_default_impl() {
        let mock = MockPal::new();
        mock.add_file("/game/hello.txt", b"Hello, World!".to_vec());

        let pal: Box<dyn Pal> = Box::new(mock);
        assert_eq!(
            pal.read_file_to_string("/game/hello.txt").unwrap(),
            "Hello, World!"
        );
    }

    #[test]
    fn test_read_file_to_string_invalid_utf8() {
        let mock = MockPal::new();
        mock.add_file("/game/bad.txt", vec![0xFF, 0xFE]);

        assert!(mock.read_file_to_string("/game/bad.txt").is_err());
    }
}
