//! Value trees for deep equality
//!
//! [`capture`] records a value through its `Serialize` impl as a [`Node`]
//! tree covering the whole serde data model. `None` and `Some(())` stay
//! apart, as do newtype wrappers and the variants of an enum. Integers keep
//! their full 128-bit range and map keys may be any serializable value.
//!
//! Two trees are equal when they have the same shape and equal leaves. Map
//! entries are matched regardless of order. Floats compare numerically, so
//! `NaN` is never equal to anything.

use serde::ser::{self, Serialize};
use std::fmt;
use thiserror::Error;

/// A value's `Serialize` impl reported an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CaptureError(String);

impl ser::Error for CaptureError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CaptureError(msg.to_string())
    }
}

/// One captured value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Bool(bool),
    Signed(i128),
    Unsigned(u128),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Option(Option<Box<Node>>),
    Unit,
    UnitStruct(&'static str),
    UnitVariant {
        name: &'static str,
        variant: &'static str,
    },
    NewtypeStruct(&'static str, Box<Node>),
    NewtypeVariant {
        name: &'static str,
        variant: &'static str,
        value: Box<Node>,
    },
    Seq(Vec<Node>),
    Tuple(Vec<Node>),
    TupleStruct(&'static str, Vec<Node>),
    TupleVariant {
        name: &'static str,
        variant: &'static str,
        fields: Vec<Node>,
    },
    Map(Entries),
    Struct(&'static str, Vec<(&'static str, Node)>),
    StructVariant {
        name: &'static str,
        variant: &'static str,
        fields: Vec<(&'static str, Node)>,
    },
}

/// Map entries in serialization order; equality ignores the order.
#[derive(Debug, Clone, Default)]
pub struct Entries(pub Vec<(Node, Node)>);

impl PartialEq for Entries {
    fn eq(&self, other: &Self) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        let mut used = vec![false; other.0.len()];
        self.0.iter().all(|entry| {
            let found = other
                .0
                .iter()
                .enumerate()
                .position(|(idx, candidate)| !used[idx] && candidate == entry);
            match found {
                Some(idx) => {
                    used[idx] = true;
                    true
                }
                None => false,
            }
        })
    }
}

/// Capture `value` as a [`Node`] tree.
pub fn capture<T>(value: &T) -> Result<Node, CaptureError>
where
    T: Serialize + ?Sized,
{
    value.serialize(Capture)
}

struct Capture;

impl ser::Serializer for Capture {
    type Ok = Node;
    type Error = CaptureError;
    type SerializeSeq = SeqCapture;
    type SerializeTuple = SeqCapture;
    type SerializeTupleStruct = SeqCapture;
    type SerializeTupleVariant = SeqCapture;
    type SerializeMap = MapCapture;
    type SerializeStruct = StructCapture;
    type SerializeStructVariant = StructCapture;

    fn serialize_bool(self, v: bool) -> Result<Node, CaptureError> {
        Ok(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, CaptureError> {
        Ok(Node::Signed(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, CaptureError> {
        Ok(Node::Signed(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, CaptureError> {
        Ok(Node::Signed(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, CaptureError> {
        Ok(Node::Signed(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Node, CaptureError> {
        Ok(Node::Signed(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node, CaptureError> {
        Ok(Node::Unsigned(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, CaptureError> {
        Ok(Node::Unsigned(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, CaptureError> {
        Ok(Node::Unsigned(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, CaptureError> {
        Ok(Node::Unsigned(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Node, CaptureError> {
        Ok(Node::Unsigned(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Node, CaptureError> {
        Ok(Node::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, CaptureError> {
        Ok(Node::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<Node, CaptureError> {
        Ok(Node::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Node, CaptureError> {
        Ok(Node::Str(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, CaptureError> {
        Ok(Node::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Node, CaptureError> {
        Ok(Node::Option(None))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node, CaptureError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Node::Option(Some(Box::new(capture(value)?))))
    }

    fn serialize_unit(self) -> Result<Node, CaptureError> {
        Ok(Node::Unit)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Node, CaptureError> {
        Ok(Node::UnitStruct(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, CaptureError> {
        Ok(Node::UnitVariant { name, variant })
    }

    fn serialize_newtype_struct<T>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Node, CaptureError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Node::NewtypeStruct(name, Box::new(capture(value)?)))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, CaptureError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Node::NewtypeVariant {
            name,
            variant,
            value: Box::new(capture(value)?),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCapture, CaptureError> {
        Ok(SeqCapture::new(SeqKind::Seq, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCapture, CaptureError> {
        Ok(SeqCapture::new(SeqKind::Tuple, len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SeqCapture, CaptureError> {
        Ok(SeqCapture::new(SeqKind::TupleStruct(name), len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqCapture, CaptureError> {
        Ok(SeqCapture::new(SeqKind::TupleVariant { name, variant }, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCapture, CaptureError> {
        Ok(MapCapture {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<StructCapture, CaptureError> {
        Ok(StructCapture {
            name,
            variant: None,
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructCapture, CaptureError> {
        Ok(StructCapture {
            name,
            variant: Some(variant),
            fields: Vec::with_capacity(len),
        })
    }
}

enum SeqKind {
    Seq,
    Tuple,
    TupleStruct(&'static str),
    TupleVariant {
        name: &'static str,
        variant: &'static str,
    },
}

struct SeqCapture {
    kind: SeqKind,
    items: Vec<Node>,
}

impl SeqCapture {
    fn new(kind: SeqKind, len: usize) -> Self {
        Self {
            kind,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(capture(value)?);
        Ok(())
    }

    fn finish(self) -> Node {
        match self.kind {
            SeqKind::Seq => Node::Seq(self.items),
            SeqKind::Tuple => Node::Tuple(self.items),
            SeqKind::TupleStruct(name) => Node::TupleStruct(name, self.items),
            SeqKind::TupleVariant { name, variant } => Node::TupleVariant {
                name,
                variant,
                fields: self.items,
            },
        }
    }
}

impl ser::SerializeSeq for SeqCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(self.finish())
    }
}

struct MapCapture {
    entries: Vec<(Node, Node)>,
    key: Option<Node>,
}

impl ser::SerializeMap for MapCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.key = Some(capture(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| <CaptureError as ser::Error>::custom("map value without a key"))?;
        self.entries.push((key, capture(value)?));
        Ok(())
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(Node::Map(Entries(self.entries)))
    }
}

struct StructCapture {
    name: &'static str,
    variant: Option<&'static str>,
    fields: Vec<(&'static str, Node)>,
}

impl StructCapture {
    fn push<T>(&mut self, key: &'static str, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.fields.push((key, capture(value)?));
        Ok(())
    }

    fn finish(self) -> Node {
        match self.variant {
            None => Node::Struct(self.name, self.fields),
            Some(variant) => Node::StructVariant {
                name: self.name,
                variant,
                fields: self.fields,
            },
        }
    }
}

impl ser::SerializeStruct for StructCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for StructCapture {
    type Ok = Node;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), CaptureError>
    where
        T: Serialize + ?Sized,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Node, CaptureError> {
        Ok(self.finish())
    }
}
