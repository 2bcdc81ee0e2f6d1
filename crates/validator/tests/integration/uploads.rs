//! Integration test: profile form with image uploads
//!
//! Uploaded files live on disk; the default reader sniffs their content.

use std::io::Write;
use std::path::Path;

use formguard_validator::prelude::*;
use formguard_validator::validators::{FileBatch, FileDescriptor, UPLOAD_NO_FILE, UPLOAD_OK};
use serde_json::{Value, json};
use tempfile::NamedTempFile;

const MB: u64 = 1024 * 1024;
const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

fn temp_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn descriptor(name: &str, path: &Path, size_bytes: u64) -> FileDescriptor {
    FileDescriptor {
        original_name: name.into(),
        mime_hint: "image/png".into(),
        temp_path: path.to_path_buf(),
        upload_error_code: UPLOAD_OK,
        size_bytes,
    }
}

fn registry() -> Registry {
    let registry = Registry::new();
    registry.register("Profile", |_: &Value| {
        Ok(RuleSet::new()
            .rule(Rule::image("avatar", "avatar")?)
            .rule(Rule::new(
                "gallery",
                "gallery",
                RuleOptions::images().image_count(1, 3).optional(),
            )?))
    });
    registry
}

fn validate(profile: &Value) -> indexmap::IndexMap<String, String> {
    let registry = registry();
    Validator::new(&registry)
        .validate_value("Profile", profile, true)
        .unwrap()
        .flatten()
}

#[test]
fn png_under_the_cap_passes() {
    let png = temp_file(PNG_HEADER);
    let profile = json!({ "avatar": descriptor("me.png", png.path(), 4 * MB) });
    assert!(validate(&profile).is_empty());
}

#[test]
fn file_over_the_cap_cites_the_cap() {
    let png = temp_file(PNG_HEADER);
    let profile = json!({ "avatar": descriptor("me.png", png.path(), 6 * MB) });
    assert_eq!(
        validate(&profile)["avatar"],
        "me.png exceeds the maximum size limit of 5MB."
    );
}

#[test]
fn disguised_file_is_caught_by_content() {
    let script = temp_file(b"#!/bin/sh\necho pwned\n");
    let profile = json!({ "avatar": descriptor("me.png", script.path(), 100) });
    assert_eq!(
        validate(&profile)["avatar"],
        "me.png does not contain a valid image content."
    );
}

#[test]
fn vanished_temp_file_cannot_be_read() {
    let path = {
        let png = temp_file(PNG_HEADER);
        png.path().to_path_buf()
    };
    let profile = json!({ "avatar": descriptor("me.png", &path, 100) });
    assert_eq!(validate(&profile)["avatar"], "me.png could not be read.");
}

#[test]
fn missing_avatar_is_required() {
    let empty = FileDescriptor {
        upload_error_code: UPLOAD_NO_FILE,
        ..FileDescriptor::default()
    };
    assert_eq!(validate(&json!({ "avatar": empty }))["avatar"], "Avatar is required.");
    assert_eq!(validate(&json!({}))["avatar"], "Avatar is required.");
}

#[test]
fn gallery_batch_reports_first_bad_file() {
    let avatar = temp_file(PNG_HEADER);
    let good = temp_file(b"GIF89a\x01\0\x01\0");
    let bad = temp_file(b"not an image");

    let gallery = FileBatch {
        original_name: vec!["one.gif".into(), "two.gif".into()],
        mime_hint: vec!["image/gif".into(), "image/gif".into()],
        temp_path: vec![good.path().to_path_buf(), bad.path().to_path_buf()],
        upload_error_code: vec![UPLOAD_OK, UPLOAD_OK],
        size_bytes: vec![10, 10],
    };
    let profile = json!({
        "avatar": descriptor("me.png", avatar.path(), 100),
        "gallery": gallery,
    });
    let errors = validate(&profile);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors["gallery"],
        "two.gif does not contain a valid image content."
    );
}

#[test]
fn gallery_count_is_bounded() {
    let avatar = temp_file(PNG_HEADER);
    let good = temp_file(b"GIF89a");
    let path = good.path().display().to_string();
    let profile = json!({
        "avatar": descriptor("me.png", avatar.path(), 100),
        "gallery": {
            "originalName": ["a.gif", "b.gif", "c.gif", "d.gif"],
            "mimeHint": ["image/gif", "image/gif", "image/gif", "image/gif"],
            "tempPath": [path, path, path, path],
            "uploadErrorCode": [0, 0, 0, 0],
            "sizeBytes": [1, 1, 1, 1],
        },
    });
    assert_eq!(
        validate(&profile)["gallery"],
        "Gallery can only include up to 3 files."
    );
}

#[test]
fn empty_optional_gallery_passes() {
    let avatar = temp_file(PNG_HEADER);
    let profile = json!({
        "avatar": descriptor("me.png", avatar.path(), 100),
        "gallery": FileBatch::default(),
    });
    assert!(validate(&profile).is_empty());
}
