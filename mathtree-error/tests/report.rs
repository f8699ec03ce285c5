use mathtree_attrs::ErrorKind;
use mathtree_error::Error;

#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unexpected token `{}`", found),
    labels = ["this token"],
    help = "remove it",
)]
struct UnexpectedThing {
    found: String,
}

#[derive(Debug, ErrorKind)]
#[error(message = "tree is too large", note = "no source to point at")]
struct Detached;

fn render(err: &Error, source: &str) -> String {
    let raw = err.report_to_string("input", source);
    String::from_utf8(strip_ansi_escapes::strip(raw)).unwrap()
}

#[test]
fn report_names_token() {
    let err = Error::new(vec![2..3], UnexpectedThing { found: "#".to_string() });
    let text = render(&err, "x #");

    assert!(text.contains("unexpected token `#`"), "{}", text);
    assert!(text.contains("this token"), "{}", text);
    assert!(text.contains("remove it"), "{}", text);
}

#[test]
fn report_without_spans() {
    let err = Error::detached(Detached);
    let text = render(&err, "");

    assert!(text.contains("tree is too large"), "{}", text);
}

#[test]
fn downcast_kind() {
    let err = Error::new(vec![0..1], UnexpectedThing { found: "?".to_string() });

    assert!(err.is::<UnexpectedThing>());
    assert!(!err.is::<Detached>());
    assert_eq!(err.downcast_ref::<UnexpectedThing>().map(|k| k.found.as_str()), Some("?"));
}
