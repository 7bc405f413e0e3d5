//! Cart Session

use rust_decimal::Decimal;

use crate::{
    cart::lines::{CartLine, LineId, SourceRef},
    ids::ClientId,
};

/// The client a cart is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundClient {
    /// Client id
    pub id: ClientId,

    /// Client name, for display.
    pub name: String,
}

/// Lines pending invoicing plus the single client they belong to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartSession {
    lines: Vec<CartLine>,
    client: Option<BoundClient>,
}

impl CartSession {
    pub(crate) fn from_parts(lines: Vec<CartLine>, client: Option<BoundClient>) -> Self {
        let client = if lines.is_empty() { None } else { client };

        Self { lines, client }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The bound client, if any.
    pub fn client(&self) -> Option<&BoundClient> {
        self.client.as_ref()
    }

    /// Look up a line by id.
    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Sum of line totals.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Whether a line already originates from `source`.
    pub fn is_present(&self, source: SourceRef) -> bool {
        self.lines.iter().any(|line| line.source() == Some(source))
    }

    /// Sources of all sourced lines, in line order.
    pub fn sources(&self) -> impl Iterator<Item = SourceRef> + '_ {
        self.lines.iter().filter_map(CartLine::source)
    }

    pub(crate) fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub(crate) fn line_mut(&mut self, id: &LineId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == id)
    }

    pub(crate) fn remove(&mut self, id: &LineId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        if self.lines.is_empty() {
            self.client = None;
        }

        self.lines.len() != before
    }

    pub(crate) fn bind(&mut self, client: BoundClient) {
        self.client = Some(client);
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
        self.client = None;
    }
}
