use super::*;

const SAMPLE: &str = r#"
apiVersion: v1
kind: Config
preferences:
  colors: true
clusters:
- name: prod
  cluster:
    server: https://10.0.0.1:6443
    certificate-authority-data: Zm9v
- name: staging
  cluster:
    server: https://10.0.0.2:6443
    insecure-skip-tls-verify: true
users:
- name: prod-admin
  user:
    token: abc123
- name: cert-user
  user:
    client-certificate-data: Y2VydA==
    client-key-data: a2V5
contexts:
- name: prod
  context:
    cluster: prod
    user: prod-admin
    namespace: payments
- name: staging
  context:
    cluster: staging
    user: cert-user
current-context: prod
"#;

fn parse(text: &str) -> Result<ConfigDocument> {
    ConfigDocument::parse(text, Path::new("/tmp/config"))
}

#[test]
fn parse_maps_named_lists_by_name() {
    let doc = parse(SAMPLE).unwrap();
    assert_eq!(doc.clusters.len(), 2);
    assert_eq!(doc.credentials.len(), 2);
    assert_eq!(doc.contexts.len(), 2);
    assert_eq!(doc.current_context, "prod");
    assert_eq!(doc.clusters["prod"].server, "https://10.0.0.1:6443");
    assert!(!doc.clusters["prod"].insecure_skip_tls_verify);
    assert!(doc.clusters["staging"].insecure_skip_tls_verify);
    assert_eq!(doc.credentials["prod-admin"].token(), "abc123");
    assert_eq!(doc.contexts["prod"].user, "prod-admin");
}

#[test]
fn certificate_credentials_are_detected() {
    let doc = parse(SAMPLE).unwrap();
    assert!(doc.credentials["cert-user"].is_certificate_based());
    assert!(!doc.credentials["prod-admin"].is_certificate_based());

    let by_path = Credential { client_certificate: Some("/etc/kube/client.crt".into()), ..Default::default() };
    assert!(by_path.is_certificate_based());
}

#[test]
fn round_trip_keeps_unmodelled_fields() {
    let doc = parse(SAMPLE).unwrap();
    let yaml = doc.to_yaml().unwrap();
    let again = parse(&yaml).unwrap();
    assert_eq!(doc, again);

    assert!(yaml.contains("certificate-authority-data: Zm9v"));
    assert!(yaml.contains("client-key-data: a2V5"));
    assert!(yaml.contains("namespace: payments"));
    assert!(yaml.contains("colors: true"));
}

#[test]
fn empty_file_is_an_empty_document() {
    let doc = parse("  \n").unwrap();
    assert_eq!(doc, ConfigDocument::default());
    assert!(!doc.has_current_context());
}

#[test]
fn null_lists_are_accepted() {
    let doc = parse("apiVersion: v1\nkind: Config\nclusters: null\nusers: null\ncontexts: null\n").unwrap();
    assert!(doc.clusters.is_empty());
    assert!(doc.credentials.is_empty());
    assert!(doc.contexts.is_empty());
}

#[test]
fn null_document_is_an_integrity_error() {
    let err = parse("~\n").unwrap_err();
    assert!(matches!(err, Error::Integrity(_)));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = parse("clusters: [unclosed").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));

    let err = parse("clusters: 42\n").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn duplicate_names_keep_the_last_entry() {
    let text = r#"
clusters:
- name: a
  cluster:
    server: https://first
- name: a
  cluster:
    server: https://second
"#;
    let doc = parse(text).unwrap();
    assert_eq!(doc.clusters.len(), 1);
    assert_eq!(doc.clusters["a"].server, "https://second");
}

#[test]
fn fresh_document_serializes_kubectl_header() {
    let yaml = ConfigDocument::default().to_yaml().unwrap();
    assert!(yaml.contains("apiVersion: v1"));
    assert!(yaml.contains("kind: Config"));
    assert!(yaml.contains("current-context:"));
}

#[test]
fn insert_context_wires_all_three_entries() {
    let mut doc = ConfigDocument::default();
    let config = ContextConfig::new("dev", "https://dev.example.com", "t0k3n");
    doc.insert_context(&config, true);

    assert_eq!(doc.current_context, "dev");
    assert_eq!(doc.clusters["dev"].server, "https://dev.example.com");
    assert!(doc.clusters["dev"].insecure_skip_tls_verify);
    assert_eq!(doc.credentials["dev"].token(), "t0k3n");
    assert_eq!(doc.contexts["dev"], Context::new("dev", "dev"));
}

#[test]
fn name_must_be_free_in_every_namespace() {
    let doc = parse(SAMPLE).unwrap();
    assert!(matches!(doc.check_name_available("prod"), Err(Error::Conflict(_))));
    assert!(matches!(doc.check_name_available("prod-admin"), Err(Error::Conflict(_))));
    assert!(doc.check_name_available("fresh").is_ok());

    let mut only_user = ConfigDocument::default();
    only_user.credentials.insert("x".into(), Credential::bearer("t"));
    let err = only_user.check_name_available("x").unwrap_err();
    assert!(err.to_string().contains("user named \"x\""));
}
