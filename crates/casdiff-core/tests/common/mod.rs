use casdiff_core::cas::{Addr, DocumentState};
use casdiff_core::diff::{DiffAdapter, DocumentMap};
use casdiff_core::PartyId;

/// Shared document text; offsets used throughout the tests refer to it
///
/// `John`=[0,4) `met`=[5,8) `Mary`=[9,13) `Paris`=[17,22)
#[allow(dead_code)]
pub const TEXT: &str = "John met Mary in Paris yesterday.";

/// Fresh document over [`TEXT`]
#[allow(dead_code)]
pub fn doc() -> DocumentState {
    DocumentState::new(TEXT)
}

/// Add a `NamedEntity` with the given `value`
#[allow(dead_code)]
pub fn entity(doc: &mut DocumentState, begin: usize, end: usize, value: &str) -> Addr {
    let addr = doc.add_annotation("NamedEntity", begin, end);
    doc.set_feature(addr, "value", value).unwrap();
    addr
}

/// Add an `Event` annotation whose `arguments` link feature holds one link
/// record per `(role, target)` pair
#[allow(dead_code)]
pub fn event(
    doc: &mut DocumentState,
    begin: usize,
    end: usize,
    category: &str,
    arguments: &[(&str, Addr)],
) -> Addr {
    let addr = doc.add_annotation("Event", begin, end);
    doc.set_feature(addr, "category", category).unwrap();
    let links: Vec<Addr> = arguments
        .iter()
        .map(|(role, target)| {
            let link = doc.add_structure("EventArgument");
            doc.set_feature(link, "role", *role).unwrap();
            doc.set_feature(link, "target", *target).unwrap();
            link
        })
        .collect();
    doc.set_feature(addr, "arguments", links).unwrap();
    addr
}

#[allow(dead_code)]
pub fn party(name: &str) -> PartyId {
    PartyId::from(name)
}

/// One document per party
#[allow(dead_code)]
pub fn single(entries: Vec<(&str, DocumentState)>) -> DocumentMap {
    entries
        .into_iter()
        .map(|(name, doc)| (party(name), vec![Some(doc)]))
        .collect()
}

#[allow(dead_code)]
pub fn ner_adapters() -> Vec<DiffAdapter> {
    vec![DiffAdapter::span("NamedEntity", ["value"])]
}

/// `NamedEntity` plus `Event` with a role/target `arguments` link feature
#[allow(dead_code)]
pub fn event_adapters() -> Vec<DiffAdapter> {
    vec![
        DiffAdapter::span("NamedEntity", ["value"]),
        DiffAdapter::span("Event", ["category"]).with_link_feature(
            "arguments",
            Some("role"),
            Some("target"),
        ),
    ]
}
