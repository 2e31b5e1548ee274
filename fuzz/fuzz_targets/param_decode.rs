#![no_main]

//! Decode must never panic on arbitrary store strings, and whatever it
//! produces must re-encode cleanly.

use arbitrary::Arbitrary;
use facet_codec::{decode, encode};
use facet_core::FieldType;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Clone, Copy, Debug)]
enum AnyType {
    Text,
    Number,
    Bool,
    List,
}

impl From<AnyType> for FieldType {
    fn from(ty: AnyType) -> Self {
        match ty {
            AnyType::Text => FieldType::Text,
            AnyType::Number => FieldType::Number,
            AnyType::Bool => FieldType::Bool,
            AnyType::List => FieldType::List,
        }
    }
}

fuzz_target!(|input: (AnyType, String)| {
    let (ty, raw) = input;
    let ty = FieldType::from(ty);

    if let Some(value) = decode(Some(raw.as_str()), ty) {
        let _ = encode(&value);
    }
    assert_eq!(decode(None, ty), None);
});
