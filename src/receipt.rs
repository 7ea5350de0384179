//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows, Segment},
        style::BorderColor,
    },
};
use thiserror::Error;

use crate::{request::CoverRequest, solvers::Solution};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Whether a receipt line is a bundle or an item bought on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Bundle purchase
    Bundle,

    /// Individual item purchase
    Item,
}

/// One purchase on the receipt.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    kind: LineKind,
    name: String,
    price: Money<'a, Currency>,
    covers: SmallVec<[String; 8]>,
}

impl<'a> ReceiptLine<'a> {
    /// Bundle or item
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Display name of the bundle or item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price paid
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Names of the requested items this purchase covers
    pub fn covers(&self) -> &[String] {
        &self.covers
    }
}

/// Final receipt for a solved request.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Bundles in solution order, then individual items
    lines: SmallVec<[ReceiptLine<'a>; 10]>,

    /// Cost of buying every requested item on its own
    subtotal: Money<'a, Currency>,

    /// Amount paid for the chosen bundles and items
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a request and its solution.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the individual total cannot be calculated.
    pub fn from_solution(
        request: &CoverRequest<'a>,
        solution: &Solution<'a>,
    ) -> Result<Self, ReceiptError> {
        let mut lines = SmallVec::new();

        for bundle in solution.bundles(request) {
            let covers = request
                .items()
                .iter()
                .filter(|item| bundle.covers(item.id().as_str()))
                .map(|item| item.name().to_string())
                .collect();

            lines.push(ReceiptLine {
                kind: LineKind::Bundle,
                name: bundle.name().to_string(),
                price: *bundle.price(),
                covers,
            });
        }

        for item in solution.items(request) {
            lines.push(ReceiptLine {
                kind: LineKind::Item,
                name: item.name().to_string(),
                price: *item.price(),
                covers: SmallVec::from_iter([item.name().to_string()]),
            });
        }

        Ok(Receipt {
            lines,
            subtotal: request.individual_total()?,
            total: solution.total(),
            currency: request.currency(),
        })
    }

    /// Purchases on the receipt
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Cost of buying every requested item on its own
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Amount saved against buying every item on its own.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a fraction of the subtotal
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Prints the receipt: one table row per purchase, then the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Purchase", "Covers", "Price"]);

        for line in &self.lines {
            let marker = match line.kind {
                LineKind::Bundle => "bundle",
                LineKind::Item => "item",
            };

            builder.push_record([
                marker.to_string(),
                line.name.clone(),
                line.covers.join("\n"),
                line.price.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();

        for row in 1..=self.lines.len() {
            theme.insert_horizontal_line(row, separator);
        }

        table.with(theme);
        table.modify(Segment::all(), BorderColor::filled(Color::FG_BRIGHT_BLACK));
        table.modify(Columns::new(0..1), Color::FG_BRIGHT_BLACK);
        table.modify(Columns::new(2..3), Color::FG_BRIGHT_BLACK);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        let summary = self.summary_table()?;

        writeln!(out, "{summary}\n").map_err(|_err| ReceiptError::IO)
    }

    fn summary_table(&self) -> Result<Table, MoneyError> {
        let percent = percent_points_from_fractional_percentage(self.savings_percent()?);

        let mut builder = Builder::default();

        builder.push_record(["Bought separately:".to_string(), self.subtotal.to_string()]);
        builder.push_record(["Total:".to_string(), self.total.to_string()]);
        builder.push_record([
            "Savings:".to_string(),
            format!("({percent:.2}%) {}", self.savings()?),
        ]);

        let mut table = builder.build();

        table.with(Style::blank());
        table.modify(Columns::new(0..2), Alignment::right());
        table.modify(Rows::one(1), Color::BOLD);

        Ok(table)
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
