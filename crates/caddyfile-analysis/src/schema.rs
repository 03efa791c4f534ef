//! Static knowledge of which directive names are valid where.
//!
//! Every table is a sorted `&'static [&'static str]`, so lookups are binary
//! searches and completion lists come out in ascending order.

/// What is allowed inside a directive's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySchema {
    /// No model for this directive; its body is never inspected.
    Unmodeled,
    /// The body has a directive-specific shape that is not validated.
    Freeform,
    /// Exactly these names are valid immediate children.
    Names(&'static [&'static str]),
}

/// Names valid directly inside a (non-snippet) site block.
pub const TOP_LEVEL: &[&str] = &[
    "abort", "acme_server", "basicauth", "bind", "encode", "error", "file_server",
    "forward_auth", "handle", "handle_errors", "handle_path", "header", "import", "intercept",
    "invoke", "local_certs", "log", "log_append", "log_name", "log_skip", "map", "method",
    "metrics", "php_fastcgi", "push", "redir", "request_body", "request_header", "respond",
    "reverse_proxy", "rewrite", "root", "route", "templates", "tls", "tracing", "try_files",
    "uri", "vars",
];

/// Names valid inside the global options block.
pub const GLOBAL_OPTIONS: &[&str] = &[
    "acme_ca", "acme_ca_root", "acme_dns", "acme_eab", "admin", "auto_https", "cert_issuer",
    "debug", "default_bind", "email", "grace_period", "http_port", "https_port", "import",
    "key_type", "local_certs", "log", "metrics", "ocsp_interval", "ocsp_stapling",
    "on_demand_tls", "order", "persist_config", "pki", "preferred_chains", "servers",
    "shutdown_delay", "skip_install_trust", "storage", "tracing",
];

/// Top-level directives whose body is itself a site-level directive list.
pub const CONTAINERS: &[&str] = &["handle", "handle_errors", "handle_path", "route"];

const ACME_SERVER: &[&str] = &["ca", "challenges", "lifetime", "resolvers"];

const ENCODE: &[&str] = &["br", "gzip", "match", "minimum_length", "zstd"];

const FILE_SERVER: &[&str] = &[
    "browse", "disable_canonical_uris", "fs", "hide", "index", "pass_thru", "precompressed",
    "root", "status",
];

const FORWARD_AUTH: &[&str] = &[
    "copy_headers", "header_down", "header_up", "trust_forward_header", "uri",
];

const LOG: &[&str] = &[
    "exclude", "format", "hostnames", "include", "level", "output", "sampling",
];

const PHP_FASTCGI: &[&str] = &[
    "capture_stderr", "dial_timeout", "env", "index", "read_timeout", "resolve_root_symlink",
    "root", "split", "try_files", "write_timeout",
];

const REQUEST_BODY: &[&str] = &["max_size"];

const REVERSE_PROXY: &[&str] = &[
    "buffer_requests", "buffer_responses", "copy_response", "copy_response_headers", "dynamic",
    "fail_duration", "flush_interval", "handle_response", "header_down", "header_up",
    "health_body", "health_fails", "health_headers", "health_interval", "health_passes",
    "health_port", "health_request_body", "health_status", "health_timeout", "health_uri",
    "lb_policy", "lb_retries", "lb_retry_match", "lb_try_duration", "lb_try_interval",
    "max_buffer_size", "max_fails", "replace_status", "request_buffers", "response_buffers",
    "stream_close_delay", "stream_timeout", "to", "transport", "trusted_proxies",
    "unhealthy_latency", "unhealthy_request_count", "unhealthy_status",
];

const TEMPLATES: &[&str] = &["delimiters", "extensions", "mime_type", "root"];

const TLS: &[&str] = &[
    "alpn", "ca", "ca_root", "ciphers", "client_auth", "curves", "dns",
    "dns_challenge_override_domain", "eab", "get_certificate", "insecure_secrets_log", "issuer",
    "key_type", "load", "on_demand", "propagation_delay", "propagation_timeout", "protocols",
    "resolvers", "reuse_private_keys",
];

const TRACING: &[&str] = &["span"];

/// Directives with a modeled body, sorted by name.
const SUBDIRECTIVES: &[(&str, BodySchema)] = &[
    ("acme_server", BodySchema::Names(ACME_SERVER)),
    ("basicauth", BodySchema::Freeform),
    ("encode", BodySchema::Names(ENCODE)),
    ("file_server", BodySchema::Names(FILE_SERVER)),
    ("forward_auth", BodySchema::Names(FORWARD_AUTH)),
    ("header", BodySchema::Freeform),
    ("log", BodySchema::Names(LOG)),
    ("map", BodySchema::Freeform),
    ("php_fastcgi", BodySchema::Names(PHP_FASTCGI)),
    ("request_body", BodySchema::Names(REQUEST_BODY)),
    ("request_header", BodySchema::Freeform),
    ("reverse_proxy", BodySchema::Names(REVERSE_PROXY)),
    ("templates", BodySchema::Names(TEMPLATES)),
    ("tls", BodySchema::Names(TLS)),
    ("tracing", BodySchema::Names(TRACING)),
];

const TRANSPORT_HTTP: &[&str] = &[
    "compression", "dial_fallback_delay", "dial_timeout", "expect_continue_timeout",
    "keepalive", "keepalive_idle_conns", "keepalive_idle_conns_per_host", "keepalive_interval",
    "max_conns_per_host", "max_response_header", "network_proxy", "proxy_protocol",
    "read_buffer", "read_timeout", "resolvers", "response_header_timeout", "tls",
    "tls_client_auth", "tls_curves", "tls_except_ports", "tls_insecure_skip_verify",
    "tls_renegotiation", "tls_server_name", "tls_timeout", "tls_trust_pool", "versions",
    "write_buffer", "write_timeout",
];

const TRANSPORT_FASTCGI: &[&str] = &[
    "capture_stderr", "dial_timeout", "env", "read_timeout", "resolve_root_symlink", "root",
    "split", "write_timeout",
];

/// Sub-subdirective bodies keyed by (subdirective name, first argument), sorted.
const SUB_SUBDIRECTIVES: &[((&str, &str), &[&str])] = &[
    (("transport", "fastcgi"), TRANSPORT_FASTCGI),
    (("transport", "http"), TRANSPORT_HTTP),
];

/// Names that are only valid inside one specific parent, sorted by name.
const PLACEMENT_HINTS: &[(&str, &str)] = &[
    ("alpn", "tls"),
    ("br", "encode"),
    ("buffer_requests", "reverse_proxy"),
    ("buffer_responses", "reverse_proxy"),
    ("ca", "tls"),
    ("ca_root", "tls"),
    ("ciphers", "tls"),
    ("client_auth", "tls"),
    ("curves", "tls"),
    ("dns", "tls"),
    ("eab", "tls"),
    ("flush_interval", "reverse_proxy"),
    ("format", "log"),
    ("get_certificate", "tls"),
    ("gzip", "encode"),
    ("handle_response", "reverse_proxy"),
    ("header_down", "reverse_proxy"),
    ("header_up", "reverse_proxy"),
    ("health_body", "reverse_proxy"),
    ("health_interval", "reverse_proxy"),
    ("health_port", "reverse_proxy"),
    ("health_status", "reverse_proxy"),
    ("health_timeout", "reverse_proxy"),
    ("health_uri", "reverse_proxy"),
    ("key_type", "tls"),
    ("lb_policy", "reverse_proxy"),
    ("lb_retries", "reverse_proxy"),
    ("lb_try_duration", "reverse_proxy"),
    ("lb_try_interval", "reverse_proxy"),
    ("level", "log"),
    ("load", "tls"),
    ("max_buffer_size", "reverse_proxy"),
    ("max_fails", "reverse_proxy"),
    ("on_demand", "tls"),
    ("output", "log"),
    ("protocols", "tls"),
    ("replace_status", "reverse_proxy"),
    ("resolvers", "tls"),
    ("to", "reverse_proxy"),
    ("transport", "reverse_proxy"),
    ("trusted_proxies", "reverse_proxy"),
    ("unhealthy_latency", "reverse_proxy"),
    ("unhealthy_status", "reverse_proxy"),
    ("zstd", "encode"),
];

fn contains(set: &[&str], name: &str) -> bool {
    set.binary_search(&name).is_ok()
}

pub fn is_top_level(name: &str) -> bool {
    contains(TOP_LEVEL, name)
}

pub fn is_global_option(name: &str) -> bool {
    contains(GLOBAL_OPTIONS, name)
}

pub fn is_container(name: &str) -> bool {
    contains(CONTAINERS, name)
}

/// The body schema of a directive.
pub fn subdirectives_for(parent: &str) -> BodySchema {
    SUBDIRECTIVES
        .binary_search_by(|(name, _)| (*name).cmp(parent))
        .map(|index| SUBDIRECTIVES[index].1)
        .unwrap_or(BodySchema::Unmodeled)
}

/// The valid names inside a subdirective's own body, when that depends on
/// the subdirective's first argument (`transport http { ... }`).
pub fn sub_subdirectives_for(sub: &str, first_arg: &str) -> Option<&'static [&'static str]> {
    SUB_SUBDIRECTIVES
        .binary_search_by(|((name, arg), _)| (*name, *arg).cmp(&(sub, first_arg)))
        .ok()
        .map(|index| SUB_SUBDIRECTIVES[index].1)
}

/// The parent a misplaced name belongs in, if it belongs to exactly one.
pub fn placement_hint_for(name: &str) -> Option<&'static str> {
    PLACEMENT_HINTS
        .binary_search_by(|(hinted, _)| (*hinted).cmp(name))
        .ok()
        .map(|index| PLACEMENT_HINTS[index].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted(name: &str, set: &[&str]) {
        assert!(
            set.windows(2).all(|w| w[0] < w[1]),
            "{name} is not sorted and distinct"
        );
    }

    #[test]
    fn test_tables_are_sorted() {
        assert_sorted("TOP_LEVEL", TOP_LEVEL);
        assert_sorted("GLOBAL_OPTIONS", GLOBAL_OPTIONS);
        assert_sorted("CONTAINERS", CONTAINERS);
        for (parent, schema) in SUBDIRECTIVES {
            if let BodySchema::Names(names) = schema {
                assert_sorted(parent, names);
            }
        }
        for ((sub, arg), names) in SUB_SUBDIRECTIVES {
            assert_sorted(&format!("{sub} {arg}"), names);
        }
        let parents: Vec<_> = SUBDIRECTIVES.iter().map(|(name, _)| *name).collect();
        assert_sorted("SUBDIRECTIVES", &parents);
        let keys: Vec<_> = SUB_SUBDIRECTIVES.iter().map(|(key, _)| *key).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        let hinted: Vec<_> = PLACEMENT_HINTS.iter().map(|(name, _)| *name).collect();
        assert_sorted("PLACEMENT_HINTS", &hinted);
    }

    #[test]
    fn test_containers_are_top_level() {
        for name in CONTAINERS {
            assert!(is_top_level(name), "{name}");
            assert_eq!(subdirectives_for(name), BodySchema::Unmodeled, "{name}");
        }
    }

    #[test]
    fn test_hints_point_at_modeled_parents() {
        for (name, parent) in PLACEMENT_HINTS {
            assert!(!is_top_level(name), "{name} is also top-level");
            match subdirectives_for(parent) {
                BodySchema::Names(names) => assert!(names.contains(name), "{name} in {parent}"),
                other => panic!("{parent} has schema {other:?}"),
            }
        }
    }

    #[test]
    fn test_lookups() {
        assert!(is_top_level("reverse_proxy"));
        assert!(!is_top_level("to"));
        assert!(is_global_option("email"));
        assert!(!is_global_option("respond"));
        assert_eq!(subdirectives_for("header"), BodySchema::Freeform);
        assert_eq!(subdirectives_for("respond"), BodySchema::Unmodeled);
        assert!(matches!(subdirectives_for("reverse_proxy"), BodySchema::Names(n) if n.contains(&"lb_policy")));
        assert!(sub_subdirectives_for("transport", "http").is_some_and(|n| n.contains(&"read_timeout")));
        assert!(sub_subdirectives_for("transport", "fastcgi").is_some_and(|n| n.contains(&"split")));
        assert_eq!(sub_subdirectives_for("transport", "h2c"), None);
        assert_eq!(placement_hint_for("to"), Some("reverse_proxy"));
        assert_eq!(placement_hint_for("gzip"), Some("encode"));
        assert_eq!(placement_hint_for("respond"), None);
    }
}
