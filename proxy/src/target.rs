use discovery::Instance;
use http::Uri;
use std::fmt;

/// Metadata keys containing this substring override the target port.
pub const PORT_MARKER: &str = "prometheus.io/port";
/// Metadata keys containing this substring override the target path.
pub const PATH_MARKER: &str = "prometheus.io/path";

/// The scrape endpoint derived for one matched instance. Plain HTTP
/// only; built once per request and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub path: String,
}

impl Target {
    /// Validation happens here, not at derivation: metadata is trusted
    /// as-is, so a bad value only surfaces when the forward is issued.
    pub fn uri(&self) -> Result<Uri, http::Error> {
        Uri::builder()
            .scheme("http")
            .authority(self.host.as_str())
            .path_and_query(self.path.as_str())
            .build()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}{}", self.host, self.path)
    }
}

/// Derive the scrape target for a matched instance.
///
/// Both host and path fall back to the raw address. A metadata key
/// containing [`PORT_MARKER`] overrides the host to `address:value`; a
/// key containing [`PATH_MARKER`] overrides the path verbatim, with no
/// slash normalization. Metadata keeps insertion order, so when several
/// keys carry the same marker the last one wins, deterministically.
pub fn derive_target(instance: &Instance) -> Target {
    let mut host = instance.address.clone();
    let mut path = instance.address.clone();

    for (key, value) in &instance.metadata {
        if key.contains(PORT_MARKER) {
            host = format!("{}:{}", instance.address, value);
        }
        if key.contains(PATH_MARKER) {
            path = value.clone();
        }
    }

    Target { host, path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn test_instance(metadata: &[(&str, &str)]) -> Instance {
        Instance::new(
            "app-id-test",
            "10.0.0.1",
            metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<IndexMap<_, _>>(),
        )
    }

    #[test]
    fn test_path_marker_without_port_marker() {
        let instance = test_instance(&[
            ("prometheus.io/scrape", "true"),
            ("prometheus.io/path", "/metrics"),
        ]);
        let target = derive_target(&instance);
        assert_eq!(target.host, "10.0.0.1");
        assert_eq!(target.path, "/metrics");
    }

    #[test]
    fn test_port_and_path_markers() {
        let instance = test_instance(&[
            ("prometheus.io/port", "8081"),
            ("prometheus.io/path", "/metrics"),
        ]);
        let target = derive_target(&instance);
        assert_eq!(target.to_string(), "http://10.0.0.1:8081/metrics");
        assert_eq!(
            target.uri().unwrap().to_string(),
            "http://10.0.0.1:8081/metrics"
        );
    }

    #[test]
    fn test_no_markers_falls_back_to_raw_address() {
        let instance = test_instance(&[("some.other/annotation", "x")]);
        let target = derive_target(&instance);
        assert_eq!(target.host, "10.0.0.1");
        assert_eq!(target.path, "10.0.0.1");
    }

    #[test]
    fn test_marker_is_matched_as_substring() {
        // Keys only need to contain the marker, not equal it.
        let instance = test_instance(&[("wrapped.prometheus.io/port.suffix", "9000")]);
        let target = derive_target(&instance);
        assert_eq!(target.host, "10.0.0.1:9000");
    }

    #[test]
    fn test_last_matching_key_wins() {
        let instance = test_instance(&[
            ("prometheus.io/path", "/first"),
            ("extra.prometheus.io/path", "/second"),
        ]);
        assert_eq!(derive_target(&instance).path, "/second");
    }

    #[test]
    fn test_path_value_is_taken_verbatim() {
        let instance = test_instance(&[("prometheus.io/path", "metrics")]);
        assert_eq!(derive_target(&instance).path, "metrics");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let instance = test_instance(&[
            ("prometheus.io/port", "8081"),
            ("prometheus.io/path", "/metrics"),
        ]);
        assert_eq!(derive_target(&instance), derive_target(&instance));
    }
}
