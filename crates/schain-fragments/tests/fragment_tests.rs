//! Fragment scenarios over realistic bid requests

use pretty_assertions::assert_eq;
use schain_fragments::{parse_bid_request, FragmentBuilder, MissingFieldPolicy, ParserConfig};
use schain_test_utils::{bid_request_with_nodes, four_node_chain, identity_fragment, NodeFixture};

fn fragments(nodes: &[NodeFixture]) -> Vec<String> {
    parse_bid_request(&bid_request_with_nodes(nodes))
        .unwrap()
        .into_fragments()
}

#[test]
fn test_empty_chain_yields_no_fragments() {
    let parsed = parse_bid_request(&bid_request_with_nodes(&[])).unwrap();
    assert!(parsed.is_empty());
    assert!(parsed.nodes().is_empty());
}

#[test]
fn test_single_node_chain() {
    let nodes = vec![NodeFixture::new("directseller.com", "111111")];
    assert_eq!(
        fragments(&nodes),
        vec!["&schain.[0].asi=directseller.com&schain.[0].sid=111111"]
    );
}

#[test]
fn test_four_node_chain() {
    assert_eq!(
        fragments(&four_node_chain()),
        vec![
            "&schain.[0].asi=directseller.com&schain.[0].sid=111111",
            "&schain.[1].asi=reseller.com&schain.[1].sid=222222",
            "&schain.[2].asi=exchange-1.com&schain.[2].sid=333333",
            "&schain.[3].asi=exchange-2.com&schain.[3].sid=444444",
        ]
    );
}

#[test]
fn test_two_protected_fields() {
    let mut nodes = four_node_chain();
    nodes[0] = nodes[0].clone().with_params("app.bundle");
    nodes[2] = nodes[2].clone().with_params("app.name");

    assert_eq!(
        fragments(&nodes),
        vec![
            "&schain.[0].asi=directseller.com&schain.[0].sid=111111&app.bundle=com.app.test",
            "&schain.[1].asi=reseller.com&schain.[1].sid=222222",
            "&schain.[2].asi=exchange-1.com&schain.[2].sid=333333&app.name=TestApp",
            "&schain.[3].asi=exchange-2.com&schain.[3].sid=444444",
        ]
    );
}

#[test]
fn test_two_protected_fields_one_replacement() {
    let mut nodes = four_node_chain();
    nodes[0] = nodes[0].clone().with_params("app.bundle");
    nodes[2] = nodes[2]
        .clone()
        .with_params("app.name")
        .with_replace("app.bundle=com.app.former");

    assert_eq!(
        fragments(&nodes),
        vec![
            "&schain.[0].asi=directseller.com&schain.[0].sid=111111&app.bundle=com.app.former",
            "&schain.[1].asi=reseller.com&schain.[1].sid=222222",
            "&schain.[2].asi=exchange-1.com&schain.[2].sid=333333\
             &app.name=TestApp&app.bundle=com.app.test",
            "&schain.[3].asi=exchange-2.com&schain.[3].sid=444444",
        ]
    );
}

#[test]
fn test_two_protected_fields_double_replacement() {
    let mut nodes = four_node_chain();
    nodes[0] = nodes[0].clone().with_params("app.bundle");
    nodes[2] = nodes[2]
        .clone()
        .with_params("app.name")
        .with_replace("app.bundle=com.app.original");
    nodes[3] = nodes[3].clone().with_replace("app.bundle=com.app.former");

    assert_eq!(
        fragments(&nodes),
        vec![
            "&schain.[0].asi=directseller.com&schain.[0].sid=111111&app.bundle=com.app.original",
            "&schain.[1].asi=reseller.com&schain.[1].sid=222222",
            "&schain.[2].asi=exchange-1.com&schain.[2].sid=333333\
             &app.name=TestApp&app.bundle=com.app.former",
            "&schain.[3].asi=exchange-2.com&schain.[3].sid=444444&app.bundle=com.app.test",
        ]
    );
}

#[test]
fn test_replacement_of_unprotected_field_uses_document() {
    let nodes = vec![
        NodeFixture::new("directseller.com", "111111"),
        NodeFixture::new("reseller.com", "222222").with_replace("app.domain=old.example.com"),
    ];

    assert_eq!(
        fragments(&nodes),
        vec![
            identity_fragment(0, "directseller.com", "111111"),
            identity_fragment(1, "reseller.com", "222222") + "&app.domain=com.app.test",
        ]
    );
}

#[test]
fn test_values_are_escaped_and_keys_verbatim() {
    let nodes = vec![
        NodeFixture::new("direct seller.com", "1&1").with_params("app.storeurl&app.cat.[0]"),
    ];

    assert_eq!(
        fragments(&nodes),
        vec![
            "&schain.[0].asi=direct+seller.com&schain.[0].sid=1%261\
             &app.storeurl=https%3A%2F%2Fplay.google.com%2Fstore%2Fapps\
             %2Fdetails%3Fid%3Dcom.app.test\
             &app.cat.[0]=IAB22"
        ]
    );
}

#[test]
fn test_tilde_kept_and_star_escaped_in_signed_values() {
    let nodes = vec![
        NodeFixture::new("a.com", "1").with_params("app.storeurl"),
        NodeFixture::new("b.com", "2")
            .with_replace("app.storeurl=https%3A%2F%2Fx.com%2F~user%2Fa*b"),
    ];

    assert_eq!(
        fragments(&nodes)[0],
        "&schain.[0].asi=a.com&schain.[0].sid=1\
         &app.storeurl=https%3A%2F%2Fx.com%2F~user%2Fa%2Ab"
    );
}

#[test]
fn test_multibyte_replacement_round_trips_into_fragment() {
    let nodes = vec![
        NodeFixture::new("a.com", "1").with_params("app.name"),
        NodeFixture::new("b.com", "2").with_replace("app.name=Caf%C3%A9+App"),
    ];

    assert_eq!(
        fragments(&nodes)[0],
        "&schain.[0].asi=a.com&schain.[0].sid=1&app.name=Caf%C3%A9+App"
    );
}

#[test]
fn test_non_string_field_uses_raw_json() {
    let nodes = vec![NodeFixture::new("a.com", "1").with_params("app.publisher")];

    assert_eq!(
        fragments(&nodes),
        vec!["&schain.[0].asi=a.com&schain.[0].sid=1&app.publisher=%7B%22id%22%3A%2212345%22%7D"]
    );
}

#[test]
fn test_missing_protected_field_emits_empty_value() {
    let nodes = vec![NodeFixture::new("a.com", "1").with_params("site.page&app.name")];

    assert_eq!(
        fragments(&nodes),
        vec!["&schain.[0].asi=a.com&schain.[0].sid=1&site.page=&app.name=TestApp"]
    );
}

#[test]
fn test_missing_protected_field_rejected_when_configured() {
    let builder = FragmentBuilder::new(
        ParserConfig::new().with_missing_field_policy(MissingFieldPolicy::Reject),
    );
    let nodes = vec![NodeFixture::new("a.com", "1").with_params("site.page")];

    let result = builder.build(&bid_request_with_nodes(&nodes));
    assert!(result.unwrap_err().is_not_found());
}

#[test]
fn test_reject_policy_covers_own_replacement_fallback() {
    let builder = FragmentBuilder::new(
        ParserConfig::new().with_missing_field_policy(MissingFieldPolicy::Reject),
    );
    let nodes = vec![
        NodeFixture::new("a.com", "1").with_params("site.page"),
        NodeFixture::new("b.com", "2").with_replace("site.page=https%3A%2F%2Fold.example"),
    ];

    let result = builder.build(&bid_request_with_nodes(&nodes));
    // Node 1's own replacement of site.page still has to resolve against the document.
    assert!(result.is_err());

    let lenient = parse_bid_request(&bid_request_with_nodes(&nodes)).unwrap();
    assert_eq!(
        lenient.signature_message_fragments()[0],
        "&schain.[0].asi=a.com&schain.[0].sid=1&site.page=https%3A%2F%2Fold.example"
    );
}

#[test]
fn test_repeated_replacement_key_keeps_first() {
    let nodes = vec![
        NodeFixture::new("a.com", "1").with_params("app.bundle"),
        NodeFixture::new("b.com", "2").with_replace("app.bundle=first&app.bundle=second"),
    ];

    assert_eq!(
        fragments(&nodes),
        vec![
            "&schain.[0].asi=a.com&schain.[0].sid=1&app.bundle=first",
            "&schain.[1].asi=b.com&schain.[1].sid=2&app.bundle=com.app.test",
        ]
    );
}

#[test]
fn test_duplicate_protected_paths_are_kept() {
    let nodes = vec![NodeFixture::new("a.com", "1").with_params("app.name&app.name")];

    assert_eq!(
        fragments(&nodes),
        vec!["&schain.[0].asi=a.com&schain.[0].sid=1&app.name=TestApp&app.name=TestApp"]
    );
}
