//! Wire models
//!
//! Plain records mirroring the remote resources. Every entity field is optional
//! because the API omits fields depending on request options, and unknown fields
//! are ignored so new server fields never break decoding.

mod entities;
mod requests;

pub use entities::{Column, PagedResponse, ParentRef, ResourceRef, Row, RowReference, Table};
pub use requests::{
    InsertRowsRequest, MutationResponse, NoContent, RowCell, RowData, UpdateRowRequest,
};

#[cfg(test)]
mod tests;
