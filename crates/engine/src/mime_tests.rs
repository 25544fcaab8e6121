use super::*;

#[test]
fn table_is_sorted() {
    assert!(BY_EXTENSION.windows(2).all(|w| w[0].0 < w[1].0));
}

#[test]
fn lookups() {
    let cases = [
        ("notes.txt", false, Some("text/plain")),
        ("PHOTO.JPG", false, Some("image/jpeg")),
        ("archive.tar.gz", false, Some("application/gzip")),
        ("src", true, Some("inode/directory")),
        (".bashrc", false, None),
        ("Makefile", false, None),
        ("trailing.", false, None),
        ("data.unknownext", false, None),
    ];

    for (name, is_dir, expected) in cases {
        assert_eq!(media_type(name, is_dir), expected, "{name}");
    }
}
