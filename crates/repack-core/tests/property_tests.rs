//! Property-based tests for destination path mapping.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use proptest::prelude::*;
use repack_core::PathPolicy;
use repack_core::paths::final_archive_path;
use repack_core::paths::intermediate_archive_path;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _().-]{1,16}".prop_filter("not a dot segment", |s| s != "." && s != "..")
}

proptest! {
    /// Destinations always land under the output root.
    #[test]
    fn prop_dest_dir_under_output_root(
        dirs in prop::collection::vec(segment(), 0..5),
        stem in segment(),
    ) {
        let policy = PathPolicy::new("/in", "/out");
        let mut source = PathBuf::from("/in");
        source.extend(&dirs);
        source.push(format!("{stem}.cbr"));

        let dest = policy.dest_dir(&source).unwrap();
        prop_assert!(dest.starts_with("/out"));
        prop_assert!(final_archive_path(&dest).starts_with("/out"));
    }

    /// The relative directory of the source is reproduced under the output root.
    #[test]
    fn prop_relative_structure_mirrored(
        dirs in prop::collection::vec(segment(), 0..5),
        stem in segment(),
    ) {
        let policy = PathPolicy::new("/in", "/out");
        let relative: PathBuf = dirs.iter().collect();
        let source = PathBuf::from("/in").join(&relative).join(format!("{stem}.cbr"));

        prop_assert_eq!(policy.relative_subpath(&source).unwrap(), relative.clone());
        let dest = policy.dest_dir(&source).unwrap();
        prop_assert_eq!(dest.parent().unwrap(), PathBuf::from("/out").join(&relative));
    }

    /// Same-named archives in different directories never share a destination.
    #[test]
    fn prop_no_collision_across_directories(
        a in segment(),
        b in segment(),
        stem in segment(),
    ) {
        prop_assume!(a != b);
        let policy = PathPolicy::new("/in", "/out");
        let first = policy.dest_dir(&PathBuf::from(format!("/in/{a}/{stem}.cbr"))).unwrap();
        let second = policy.dest_dir(&PathBuf::from(format!("/in/{b}/{stem}.cbr"))).unwrap();

        prop_assert_ne!(&first, &second);
        prop_assert_ne!(final_archive_path(&first), final_archive_path(&second));
    }

    /// The final archive keeps the full base name, dots included.
    #[test]
    fn prop_final_name_keeps_base_name(stem in segment()) {
        let policy = PathPolicy::new("/in", "/out");
        let dest = policy.dest_dir(&PathBuf::from(format!("/in/{stem}.cbr"))).unwrap();

        prop_assert_eq!(
            final_archive_path(&dest),
            PathBuf::from(format!("/out/{stem}.cbz"))
        );
        prop_assert_eq!(
            intermediate_archive_path(&dest),
            PathBuf::from(format!("/out/{stem}.zip"))
        );
    }
}
