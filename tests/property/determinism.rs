//! Property-based tests for digest determinism

use proptest::prelude::*;
use reelflow::hasher;

/// Equal content gives equal digests, unequal content (almost surely) does not
#[test]
fn test_text_digest_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(".*", ".*"), |(first, second)| {
            let a = hasher::digest_text(&first);
            let b = hasher::digest_text(&second);

            prop_assert_eq!(&a, &hasher::digest_text(&first));
            prop_assert_eq!(a.len(), 64);
            if first == second {
                prop_assert_eq!(a, b);
            } else {
                prop_assume!(a != b);
            }
            Ok(())
        })
        .unwrap();
}

proptest! {
    #[test]
    fn test_text_and_bytes_digests_agree(content in ".*") {
        prop_assert_eq!(
            hasher::digest_text(&content),
            hasher::digest_bytes(content.as_bytes())
        );
    }

    #[test]
    fn test_member_digest_ignores_input_order(
        members in proptest::collection::btree_map("[a-z_]{1,12}", "[0-9a-f]{64}", 1..6)
    ) {
        let forward: Vec<(String, String)> = members.clone().into_iter().collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        prop_assert_eq!(
            hasher::digest_members(&forward),
            hasher::digest_members(&reversed)
        );
    }
}
