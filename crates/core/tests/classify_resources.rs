#![forbid(unsafe_code)]

use kubepeek_core::{classify_resource, Resource, StatusLabel};

fn res(yaml: &str) -> Resource {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn classification_is_a_function_of_kind_and_status() {
    let cases = [
        ("kind: Pod\nstatus:\n  phase: Running\n", StatusLabel::Running),
        ("kind: Pod\nmetadata:\n  name: p\n", StatusLabel::Unknown),
        ("kind: Pod\nstatus: null\n", StatusLabel::Unknown),
        ("kind: Deployment\nstatus:\n  conditions:\n  - type: Available\n    status: \"True\"\n", StatusLabel::Running),
        ("kind: Deployment\nstatus:\n  conditions: []\n", StatusLabel::Pending),
        ("kind: Deployment\nstatus:\n  conditions: nope\n", StatusLabel::Pending),
        ("kind: ConfigMap\nstatus: {}\ndata:\n  k: v\n", StatusLabel::Running),
        ("kind: ConfigMap\ndata:\n  k: v\n", StatusLabel::Unknown),
        ("kind: Kustomization\nstatus:\n  conditions:\n  - type: Ready\n    status: \"True\"\n", StatusLabel::Running),
        ("kind: Kustomization\nstatus:\n  conditions:\n  - {status: \"True\"}\n  - \"Ready\"\n", StatusLabel::Unknown),
        ("kind: Job\nstatus: [1, 2]\n", StatusLabel::Unknown),
    ];
    for (y, want) in cases {
        let r = res(y);
        assert_eq!(classify_resource(&r), want, "case {:?}", y);
        // same input, same label
        assert_eq!(classify_resource(&r.clone()), want);
    }
}

#[test]
fn payload_sections_pass_through_untouched() {
    let r = res(
        "apiVersion: rbac.authorization.k8s.io/v1\nkind: RoleBinding\nmetadata:\n  name: rb\nsubjects:\n- kind: User\n  name: alice\nroleRef:\n  kind: Role\n  name: reader\n",
    );
    assert_eq!(r.api_version, "rbac.authorization.k8s.io/v1");
    let subjects = r.subjects.as_ref().and_then(|s| s.as_sequence()).unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(r.role_ref.as_ref().and_then(|v| v.get("name")).and_then(|v| v.as_str()), Some("reader"));
    assert!(r.extra.is_empty());
}
