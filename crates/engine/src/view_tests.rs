use std::{fs, path::Path, sync::Arc};

use fileprops_fs::Platform;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

use super::*;
use crate::{
    format::ModeBits,
    testing::{FakeRunner, env, settings},
};

struct Fixture {
    _dir: TempDir,
    file: Locator,
}

fn fixture(name: &str, size: usize) -> Fixture {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, vec![b'x'; size]).unwrap();
    Fixture {
        file: Locator::file(path),
        _dir: dir,
    }
}

fn request(locator: &Locator, generation: u64) -> RenderRequest {
    RenderRequest {
        view: ViewKind::Command,
        locator: locator.clone(),
        generation,
    }
}

fn render(pairs: &[(&str, Value)], locator: &Locator) -> ViewContent {
    let env = env(settings(pairs), Arc::new(FakeRunner::stat("test-user", "test-group")));
    assemble(&env, &request(locator, 1)).unwrap()
}

fn size_cell(doc: &str) -> &str {
    let start = doc.find("data-type=\"size\"").unwrap();
    let cell = &doc[start..];
    let value = cell.find("<td class=\"value-cell\">").unwrap() + "<td class=\"value-cell\">".len();
    let end = cell[value..].find("</td>").unwrap();
    &cell[value..value + end]
}

#[test]
fn small_sizes_show_raw_bytes_only() {
    for (size, expected) in [(100, "100 B"), (999, "999 B")] {
        let fx = fixture("small.bin", size);
        let content = render(&[("propertyRows", json!(["size"]))], &fx.file);
        assert_eq!(size_cell(content.document.as_str()), expected);
    }
}

#[test]
fn large_sizes_add_exact_count() {
    let fx = fixture("large.bin", 1000);
    let content = render(&[("propertyRows", json!(["size"]))], &fx.file);
    assert_eq!(size_cell(content.document.as_str()), "1 kB (1,000 B)");

    let content = render(
        &[("propertyRows", json!(["size"])), ("sizeMode", json!("kibi"))],
        &fx.file,
    );
    assert_eq!(size_cell(content.document.as_str()), "1,000 B (1,000 B)");
}

#[test]
fn configured_order_is_display_order() {
    let fx = fixture("order.txt", 10);
    let content = render(&[("propertyRows", json!(["size", "name"]))], &fx.file);
    let doc = content.document.as_str();

    let size = doc.find(">Size<").unwrap();
    let name = doc.find(">Name<").unwrap();
    assert!(size < name);
    assert_eq!(doc.matches("class=\"property-row\"").count(), 2);
    assert!(!doc.contains(">Modified<"));
}

#[test]
fn unknown_descriptors_are_ignored() {
    let fx = fixture("plain.txt", 10);
    let content = render(
        &[("propertyRows", json!(["name", "bogus-descriptor"]))],
        &fx.file,
    );
    let doc = content.document.as_str();

    assert!(doc.contains(">Name<"));
    assert!(!doc.contains("bogus"));
    assert_eq!(doc.matches("class=\"property-row\"").count(), 1);
}

#[test]
fn hidden_header_stays_in_the_document() {
    let fx = fixture("header.txt", 10);

    let shown = render(&[], &fx.file);
    assert!(shown.document.as_str().contains("<thead><tr><th>Property</th><th>Value</th>"));

    let hidden = render(&[("showHeader", json!(false))], &fx.file);
    assert!(
        hidden
            .document
            .as_str()
            .contains("<thead class=\"sr-only\"><tr><th>Property</th><th>Value</th>")
    );
}

#[test]
fn zebra_stripe_modes() {
    let fx = fixture("zebra.txt", 10);

    let on = render(&[], &fx.file);
    assert!(on.document.as_str().contains("<table class=\"properties zebra-stripes\">"));

    let off = render(&[("zebraStripes", json!(false))], &fx.file);
    assert!(off.document.as_str().contains("<table class=\"properties\">"));

    let custom = render(&[("zebraStripes", json!("rgba(0, 0, 0, 0.1)"))], &fx.file);
    assert!(custom.document.as_str().contains(
        "<table class=\"properties zebra-stripes\" style=\"--zebra-stripe-background: rgba(0, 0, 0, 0.1);\">"
    ));
}

#[cfg(unix)]
#[test]
fn owner_placeholder_resolves() {
    let fx = fixture("owned.txt", 10);
    let content = render(&[("propertyRows", json!(["name", "owner"]))], &fx.file);
    let doc = content.document.as_str();

    assert!(doc.contains("data-type=\"owner\" data-async-id=\"owner-1\">"));
    assert!(doc.contains("<td class=\"value-cell\">...</td>"));
    assert!(!doc.contains("test-user"));

    let mut pending = content.pending;
    assert_eq!(pending.len(), 1);
    let update = pending.remove(0).resolve();
    assert_eq!(update.render_generation, 1);
    assert_eq!(update.row_kind, "owner");
    assert_eq!(update.async_token, "owner-1");
    assert_eq!(update.value, "test-user (test-group)");

    let patched = patch_row(doc, &update).unwrap();
    assert!(patched.contains("<td class=\"value-cell\">test-user (test-group)</td>"));
}

#[test]
fn failed_owner_lookup_resolves_to_error_marker() {
    let fx = fixture("acl.txt", 10);
    let env = env(
        settings(&[("propertyRows", json!(["owner"]))]),
        Arc::new(FakeRunner::default()),
    )
    .with_platform(Platform::Windows, ModeBits::empty());

    let content = assemble(&env, &request(&fx.file, 7)).unwrap();
    let update = content.pending.into_iter().next().unwrap().resolve();

    assert_eq!(update.render_generation, 7);
    assert_eq!(update.value, "[error]");
}

#[test]
fn assembly_is_idempotent_modulo_generation() {
    let fx = fixture("same.txt", 4096);
    let env = env(settings(&[]), Arc::new(FakeRunner::stat("u", "g")));

    let first = assemble(&env, &request(&fx.file, 1)).unwrap();
    let second = assemble(&env, &request(&fx.file, 2)).unwrap();

    let normalize = |doc: &Markup, generation: u64| {
        doc.as_str()
            .replace(&format!("window.renderGeneration = {generation};"), "GEN")
            .replace(&format!("data-render-generation=\"{generation}\""), "GEN")
    };

    assert_ne!(first.document, second.document);
    assert_eq!(normalize(&first.document, 1), normalize(&second.document, 2));
    assert_eq!(first.pending.len(), second.pending.len());
}

#[test]
fn missing_resource_fails_the_render() {
    let dir = tempdir().unwrap();
    let env = env(settings(&[]), Arc::new(FakeRunner::default()));
    let locator = Locator::file(dir.path().join("gone.txt"));

    let err = assemble(&env, &request(&locator, 1)).unwrap_err();
    assert!(matches!(err, RenderError::Resolve(_)));
}

#[test]
fn media_info_rows_are_appended_when_enabled() {
    let fx = fixture("clip.mp4", 10);
    let runner = FakeRunner::default();
    runner.answer(
        "mediainfo",
        Some(r#"{"media":{"track":[{"@type":"Video","Frame_Rate":"25.000"}]}}"#),
    );
    let runner = Arc::new(runner);

    let disabled = env(settings(&[("propertyRows", json!(["name"]))]), runner.clone());
    let content = assemble(&disabled, &request(&fx.file, 1)).unwrap();
    assert!(!content.document.as_str().contains("Media Info"));
    assert!(runner.calls().is_empty());

    let enabled = env(
        settings(&[
            ("propertyRows", json!(["name"])),
            ("queryMediaInfo", json!(true)),
        ]),
        runner.clone(),
    );
    let doc = assemble(&enabled, &request(&fx.file, 1)).unwrap().document;
    let doc = doc.as_str();

    let name = doc.find(">Name<").unwrap();
    let group = doc.find(">Media Info<").unwrap();
    assert!(name < group);
    assert!(doc.contains("class=\"sub-group-cell\" style=\"--indent: 0\">Video<"));
    assert!(doc.contains("style=\"--indent: 1\">Frame Rate</td><td class=\"value-cell\">25.000<"));
}

#[test]
fn style_override_and_fallback() {
    let fx = fixture("styled.txt", 10);
    let css = fx.file.as_path().unwrap().with_file_name("custom.css");
    fs::write(&css, "body { --marker: custom; }").unwrap();

    let custom = render(&[("outputStylePath", json!(css.display().to_string()))], &fx.file);
    assert!(custom.document.as_str().contains("--marker: custom"));

    let missing = Path::new("/definitely/not/here.css");
    let fallback = render(
        &[("outputStylePath", json!(missing.display().to_string()))],
        &fx.file,
    );
    assert!(fallback.document.as_str().contains(".zebra-stripes"));
}

#[test]
fn document_carries_generation_and_view_kind() {
    let fx = fixture("gen.txt", 10);
    let env = env(settings(&[]), Arc::new(FakeRunner::default()));
    let content = assemble(
        &env,
        &RenderRequest {
            view: ViewKind::Static,
            locator: fx.file.clone(),
            generation: 42,
        },
    )
    .unwrap();
    let doc = content.document.as_str();

    assert_eq!(content.generation, 42);
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<script>window.renderGeneration = 42;</script>"));
    assert!(doc.contains("<body class=\"view-static\" data-render-generation=\"42\">"));
}

#[test]
fn patch_row_ignores_other_generations_and_tokens() {
    let doc = "<body data-render-generation=\"3\"><tr class=\"property-row\" data-type=\"owner\" data-async-id=\"owner-1\"><td class=\"key-cell\">Owner</td><td class=\"value-cell\">...</td></tr>";
    let update = |generation, token: &str| RowUpdate {
        render_generation: generation,
        row_kind: "owner".into(),
        async_token: token.into(),
        value: "<root>".into(),
    };

    assert!(patch_row(doc, &update(2, "owner-1")).is_none());
    assert!(patch_row(doc, &update(3, "owner-2")).is_none());
    assert_eq!(
        patch_row(doc, &update(3, "owner-1")).unwrap(),
        doc.replace(">...<", ">&lt;root&gt;<")
    );
}

#[test]
fn patch_row_writes_literal_text() {
    let doc = "<body data-render-generation=\"1\"><tr class=\"property-row\" data-type=\"owner\" data-async-id=\"owner-1\"><td class=\"key-cell\">Owner</td><td class=\"value-cell\">...</td></tr>";
    let update = RowUpdate {
        render_generation: 1,
        row_kind: "owner".into(),
        async_token: "owner-1".into(),
        value: "a&lt;b & \"c\"".into(),
    };

    let patched = patch_row(doc, &update).unwrap();
    assert!(patched.contains(
        "<td class=\"value-cell\">a&amp;lt;b &amp; &quot;c&quot;</td>"
    ));
}

#[test]
fn message_documents_escape_text() {
    let doc = message_document(&Assets::bundled(), "a <b>");
    assert!(doc.as_str().contains("<p>a &lt;b&gt;</p>"));
}
