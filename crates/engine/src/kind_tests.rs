use super::*;

#[test]
fn descriptors_round_trip() {
    for kind in RowKind::ALL {
        assert_eq!(RowKind::from_descriptor(kind.descriptor()), Some(kind));
    }
}

#[test]
fn kebab_case_aliases_and_unknowns() {
    let cases = [
        ("full-path", Some(RowKind::FullPath)),
        ("real-path", Some(RowKind::RealPath)),
        ("media-type", Some(RowKind::MediaType)),
        ("Name", None),
        ("bogus-descriptor", None),
        ("", None),
    ];

    for (input, expected) in cases {
        assert_eq!(RowKind::from_descriptor(input), expected, "{input:?}");
    }
}
