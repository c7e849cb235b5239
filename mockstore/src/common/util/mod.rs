mod document_utils;

pub(crate) use document_utils::*;
