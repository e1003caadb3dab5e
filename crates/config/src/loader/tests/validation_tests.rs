//! Endpoint validation property tests.

use proptest::prelude::*;

use crate::loader::builder::ConfigLoader;

proptest! {
    #[test]
    fn prop_normalized_urls_never_end_with_slash(
        host in "[a-z]{1,12}(\\.[a-z]{2,8}){1,3}",
        path in "(/[a-z0-9]{1,8}){0,3}",
        slashes in 0usize..4,
        https in any::<bool>(),
    ) {
        let scheme = if https { "https" } else { "http" };
        let raw = format!("{}://{}{}{}", scheme, host, path, "/".repeat(slashes));

        let config = ConfigLoader::new().with_api_url(raw).build().unwrap();
        let api_url = config.connection.api_url.unwrap();

        prop_assert!(!api_url.ends_with('/'));
        prop_assert!(api_url.starts_with(scheme));
        prop_assert!(api_url.contains(&host));
    }

    #[test]
    fn prop_dial_timeout_bounds(secs in 0u64..1200) {
        let result = ConfigLoader::new()
            .with_dial_timeout(std::time::Duration::from_secs(secs))
            .build();
        prop_assert_eq!(result.is_ok(), secs > 0 && secs <= 600);
    }
}
