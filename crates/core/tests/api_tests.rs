//! Library API integration tests over stored document fixtures
use easy_language_core::*;
use rstest::rstest;
use serde::Deserialize;

const FIXTURES: [&str; 15] = [
    "wpbakery.json",
    "salient.json",
    "divi.json",
    "avada.json",
    "enfold.json",
    "elementor.json",
    "beaver-builder.json",
    "bricks.json",
    "breakdance.json",
    "brizy.json",
    "visual-composer.json",
    "siteorigin.json",
    "themify.json",
    "block-editor.json",
    "classic.json",
];

#[derive(Debug, Deserialize)]
struct Fixture {
    builder: String,
    environment: StaticEnvironment,
    post: Post,
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/documents/{}", name)
}

fn load(name: &str) -> Fixture {
    let json = std::fs::read_to_string(get_fixture_path(name)).unwrap();
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("{}: {}", name, e))
}

#[test]
fn test_expected_builder_selected() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let builder = registry.select(&fixture.post, &fixture.environment);
        assert_eq!(builder.id(), fixture.builder, "{}", name);
    }
}

#[test]
fn test_every_fixture_has_flow_text() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let fragments = registry.extract(&fixture.post, &fixture.environment);
        assert!(!fragments.is_empty(), "{}", name);
        assert!(fragments.iter().all(|f| !f.text.trim().is_empty()), "{}", name);
    }
}

#[test]
fn test_extraction_order_is_stable() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let first = registry.extract(&fixture.post, &fixture.environment);
        let second = registry.extract(&fixture.post, &fixture.environment);
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn test_identity_reinsert_leaves_document_untouched() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let mut post = fixture.post.clone();

        for fragment in registry.extract(&fixture.post, &fixture.environment) {
            registry.reinsert(&mut post, &fixture.environment, &fragment.text, &fragment.text);
        }

        assert_eq!(post, fixture.post, "{}", name);
    }
}

#[test]
fn test_reinsert_touches_only_its_fragment() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let mut post = fixture.post.clone();
        let before = registry.extract(&post, &fixture.environment);

        let simplified = format!("{} (einfach)", before[0].text);
        registry.reinsert(&mut post, &fixture.environment, &before[0].text, &simplified);

        let after = registry.extract(&post, &fixture.environment);
        assert_eq!(after.len(), before.len(), "{}", name);
        assert_eq!(after[0].text, simplified, "{}", name);
        assert_eq!(after[1..], before[1..], "{}", name);
    }
}

#[test]
fn test_reinsert_is_idempotent() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let mut post = fixture.post.clone();
        let fragments = registry.extract(&post, &fixture.environment);
        let last = &fragments[fragments.len() - 1];

        registry.reinsert(&mut post, &fixture.environment, &last.text, "Leichte Sprache");
        let once = post.clone();
        registry.reinsert(&mut post, &fixture.environment, &last.text, "Leichte Sprache");

        assert_eq!(post.content, once.content, "{}", name);
        assert_eq!(post.meta, once.meta, "{}", name);
    }
}

#[test]
fn test_missing_fragment_is_noop() {
    let registry = BuilderRegistry::new();

    for name in FIXTURES {
        let fixture = load(name);
        let mut post = fixture.post.clone();

        registry.reinsert(&mut post, &fixture.environment, "Text that never existed", "Neuer Text");
        assert_eq!(post, fixture.post, "{}", name);
    }
}

#[test]
fn test_malformed_store_is_safe() {
    let fixture = load("elementor-malformed.json");
    let registry = BuilderRegistry::new();
    let mut post = fixture.post.clone();

    assert_eq!(registry.select(&post, &fixture.environment).id(), "elementor");
    assert!(registry.extract(&post, &fixture.environment).is_empty());

    registry.reinsert(&mut post, &fixture.environment, "Cut off", "Abgeschnitten");
    assert_eq!(post, fixture.post);
}

#[test]
fn test_fallback_covers_rendered_content() {
    let fixture = load("classic.json");
    let registry = BuilderRegistry::new();
    let mut post = fixture.post.clone();

    let fragments = registry.extract(&post, &fixture.environment);
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].is_html);
    assert_eq!(fragments[0].text, DefaultRenderer::default().render(&post.content));
    assert!(!fragments[0].text.contains("[gallery"));
    assert!(fragments[0].text.contains("[Appendix] A."));

    registry.reinsert(&mut post, &fixture.environment, &fragments[0].text, "<p>Radwerk in Hamburg.</p>");
    assert_eq!(post.content, "<p>Radwerk in Hamburg.</p>");
}

#[test]
fn test_tree_rebuild_requests() {
    let registry = BuilderRegistry::new();

    for (name, rebuilds) in [("elementor.json", true), ("brizy.json", true), ("bricks.json", false)] {
        let fixture = load(name);
        let mut post = fixture.post.clone();
        let fragments = registry.extract(&post, &fixture.environment);

        registry.reinsert(&mut post, &fixture.environment, &fragments[0].text, "Einfach");
        assert_eq!(!post.rebuilds.is_empty(), rebuilds, "{}", name);
    }
}

#[test]
fn test_encoded_stores_keep_their_encoding() {
    let registry = BuilderRegistry::new();

    let fixture = load("visual-composer.json");
    let mut post = fixture.post.clone();
    registry.reinsert(&mut post, &fixture.environment, "Find the right size", "Die passende Größe");
    let before = fixture.post.metadata_str("vcv-pageContent").unwrap();
    assert!(before.contains("Children's%20bikes"));
    assert_eq!(
        post.metadata_str("vcv-pageContent"),
        Some(before.replace("Find%20the%20right%20size", "Die%20passende%20Gr%C3%B6%C3%9Fe").as_str())
    );

    let fixture = load("brizy.json");
    let mut post = fixture.post.clone();
    registry.reinsert(&mut post, &fixture.environment, "Ask for a quote", "Fragen Sie uns");
    let editor_data = post.meta["brizy"]["brizy-post"]["editor_data"].as_str().unwrap();
    assert!(!editor_data.contains('{'));
    assert_eq!(post.meta["brizy"]["brizy-post"]["needs_compile"], true);
    let texts: Vec<String> =
        registry.extract(&post, &fixture.environment).into_iter().map(|f| f.text).collect();
    assert!(texts.contains(&"Fragen Sie uns".to_string()));
}

#[test]
fn test_escaped_store_keeps_untouched_bytes() {
    let fixture = load("elementor.json");
    let registry = BuilderRegistry::new();
    let mut post = fixture.post.clone();

    registry.reinsert(&mut post, &fixture.environment, "Bike rental", "Fahrräder leihen");

    let before = fixture.post.metadata_str("_elementor_data").unwrap();
    assert!(before.contains(r#""url":"https:\/\/example.org\/bike.jpg""#));
    assert!(before.contains(r#""alt":"Leihr\u00e4der f\u00fcr die Stadt""#));
    let expected = before.replace(r#""title":"Bike rental""#, r#""title":"Fahrr\u00e4der leihen""#);
    assert_eq!(post.metadata_str("_elementor_data"), Some(expected.as_str()));
}

/// Removes what marks a fixture as authored with its builder.
///
/// Entries are metadata keys, or `content:` followed by text to cut from the content.
fn without_markers(mut post: Post, markers: &[&str]) -> Post {
    for marker in markers {
        match marker.strip_prefix("content:") {
            Some(text) => post.content = post.content.replace(text, ""),
            None => {
                post.meta.remove(*marker);
            }
        }
    }
    post
}

#[rstest]
#[case("wpbakery", "wpbakery.json", &["_wpb_vc_js_status"])]
#[case("salient", "salient.json", &["_wpb_vc_js_status", "content:[vc_row"])]
#[case("divi", "divi.json", &["_et_pb_use_builder"])]
#[case("avada", "avada.json", &["fusion_builder_status"])]
#[case("enfold", "enfold.json", &["_aviaLayoutBuilder_active"])]
#[case("elementor", "elementor.json", &["_elementor_edit_mode"])]
#[case("beaver-builder", "beaver-builder.json", &["_fl_builder_enabled"])]
#[case("bricks", "bricks.json", &["_bricks_editor_mode"])]
#[case("breakdance", "breakdance.json", &["_breakdance_data"])]
#[case("brizy", "brizy.json", &["brizy_post_uid"])]
#[case("visual-composer", "visual-composer.json", &["vcv-be-editor", "vcv-pageContent"])]
#[case("siteorigin", "siteorigin.json", &["panels_data"])]
#[case("themify", "themify.json", &["_themify_builder_settings_json"])]
#[case("block-editor", "block-editor.json", &["content:<!-- wp:"])]
fn test_adapter_ignores_documents_it_did_not_author(
    #[case] id: &str, #[case] name: &str, #[case] markers: &[&str],
) {
    let registry = BuilderRegistry::new();
    let builder = registry.by_id(id).unwrap();
    let fixture = load(name);
    let authored = builder.extract(&fixture.post);
    assert!(!authored.is_empty(), "{}", id);

    let mut post = without_markers(fixture.post.clone(), markers);
    assert!(!builder.is_object_using_pagebuilder(&post), "{}", id);
    assert!(builder.extract(&post).is_empty(), "{}", id);

    let before = post.clone();
    let content = builder.reinsert(&mut post, &authored[0].text, "Leichte Sprache");
    assert_eq!(content, before.content, "{}", id);
    assert_eq!(post, before, "{}", id);
}

#[rstest]
#[case("wpbakery", "divi.json")]
#[case("divi", "avada.json")]
#[case("elementor", "bricks.json")]
#[case("beaver-builder", "elementor.json")]
#[case("brizy", "visual-composer.json")]
#[case("themify", "siteorigin.json")]
#[case("block-editor", "classic.json")]
fn test_adapter_ignores_other_builders_documents(#[case] id: &str, #[case] name: &str) {
    let registry = BuilderRegistry::new();
    let builder = registry.by_id(id).unwrap();
    let fixture = load(name);
    let mut post = fixture.post.clone();

    assert!(builder.extract(&post).is_empty(), "{} on {}", id, name);
    for fragment in registry.extract(&fixture.post, &fixture.environment) {
        builder.reinsert(&mut post, &fragment.text, "Leichte Sprache");
    }
    assert_eq!(post, fixture.post, "{} on {}", id, name);
}

#[test]
fn test_beaver_draft_follows_published_layout() {
    let fixture = load("beaver-builder.json");
    let registry = BuilderRegistry::new();
    let mut post = fixture.post.clone();

    registry.reinsert(&mut post, &fixture.environment, "Workshops", "Kurse");
    assert_eq!(post.meta["_fl_builder_data"]["e5f6"]["settings"]["heading"], "Kurse");
    assert_eq!(post.meta["_fl_builder_draft"]["e5f6"]["settings"]["heading"], "Kurse");
}

#[test]
fn test_orchestrator_with_replacement_map() {
    let fixture = load("wpbakery.json");
    let registry = BuilderRegistry::new();
    let mut post = fixture.post.clone();

    let simplifier = ReplacementMap::new()
        .with("Get in touch", "Schreiben Sie uns")
        .with("<p>Monday to Friday, 9 to 18.</p>", "<p>Montag bis Freitag.</p>");

    let report = Orchestrator::new(&registry).simplify_document(
        &mut post,
        &fixture.environment,
        &simplifier,
        &SimplifyOptions::default(),
    );

    assert_eq!(report.builder, "wpbakery");
    assert_eq!(report.total, 5);
    assert_eq!(report.processed, 5);
    assert_eq!(report.changed, 2);
    assert_eq!(report.remaining, 0);
    assert!(post.content.contains(r#"[vc_btn title="Schreiben Sie uns""#));
    assert!(post.content.contains("<p>Montag bis Freitag.</p>[/vc_toggle]"));
}

#[test]
fn test_orchestrator_batches() {
    let fixture = load("elementor.json");
    let registry = BuilderRegistry::new();
    let mut post = fixture.post.clone();

    let options = SimplifyOptions { offset: 1, limit: Some(1), ..Default::default() };
    let report = Orchestrator::new(&registry).simplify_document(
        &mut post,
        &fixture.environment,
        &NoopSimplifier,
        &options,
    );

    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 1);
    assert_eq!(report.changed, 0);
    assert_eq!(report.remaining, 1);
    assert_eq!(post, fixture.post);
}

#[test]
fn test_edit_links() {
    let registry = BuilderRegistry::new();

    for (name, expected) in [
        ("elementor.json", "https://example.org/wp-admin/post.php?post=106&action=elementor"),
        ("divi.json", "https://example.org/?p=103&et_fb=1"),
        ("bricks.json", "https://example.org/?p=109&bricks=run"),
        ("themify.json", "https://example.org/wp-admin/post.php?post=114&action=edit"),
    ] {
        let fixture = load(name);
        let builder = registry.select(&fixture.post, &fixture.environment);
        assert_eq!(builder.edit_link(&fixture.post, &fixture.environment), expected, "{}", name);
    }
}
