//! Translation between domain objects and Twinfield's transaction XML.
//!
//! Writing follows the element order of Twinfield's transaction schema and leaves out every
//! field that is `None`; `Some("")` becomes an empty element. Reading is the reverse: an absent
//! element maps to `None`, an empty text element to `Some("")`, and an empty numeric, date or
//! code element to `None`.
//!
//! Fields Twinfield always computes itself (number, origin, matching state and open amounts) are
//! read but never written. Base and reporting values and their rates are written only when the
//! caller supplies them explicitly.

use std::fmt::Display;
use std::str::FromStr;

use time::Date;

use crate::entities::{LineType, Transaction, TransactionKind, TransactionLine};
use crate::error::{Error, Result};
use crate::response::Response;
use crate::utils::date_format::{format_date, parse_date};
use crate::utils::decimal_format::{format_amount, format_rate};
use crate::xml::Element;

const TRANSACTIONS: &str = "transactions";
const TRANSACTION: &str = "transaction";
const HEADER: &str = "header";
const LINES: &str = "lines";
const LINE: &str = "line";

/// Builds the `<transaction>` element for a transaction.
pub fn transaction_to_xml(transaction: &Transaction) -> Result<Element> {
    transaction.validate()?;
    let kind = transaction.kind;

    let mut element = Element::new(TRANSACTION);
    if let Some(destiny) = transaction.destiny {
        element.set_attribute("destiny", destiny.as_str());
    }
    if let Some(raise_warning) = transaction.raise_warning {
        element.set_attribute("raisewarning", bool_str(raise_warning));
    }
    if let Some(auto_balance_vat) = transaction.auto_balance_vat {
        element.set_attribute("autobalancevat", bool_str(auto_balance_vat));
    }

    let mut header = Element::new(HEADER);
    push_optional(&mut header, "office", transaction.office.as_deref());
    push_optional(&mut header, "code", transaction.code.as_deref());
    push_optional(&mut header, "currency", transaction.currency.as_deref());
    push_optional(&mut header, "date", written_date("date", transaction.date)?);
    push_optional(&mut header, "period", transaction.period.map(|p| p.to_string()));
    if kind.has_invoice_fields() {
        push_optional(&mut header, "invoicenumber", transaction.invoice_number.as_deref());
    }
    if kind.has_payment_reference() {
        push_optional(
            &mut header,
            "paymentreference",
            transaction.payment_reference.as_deref(),
        );
    }
    if kind.has_invoice_fields() {
        push_optional(&mut header, "duedate", written_date("duedate", transaction.due_date)?);
    }
    push_optional(&mut header, "freetext1", transaction.free_text_1.as_deref());
    push_optional(&mut header, "freetext2", transaction.free_text_2.as_deref());
    push_optional(&mut header, "freetext3", transaction.free_text_3.as_deref());
    push_optional(
        &mut header,
        "originreference",
        transaction.origin_reference.as_deref(),
    );
    element.push(header);

    let mut lines = Element::new(LINES);
    for line in &transaction.lines {
        lines.push(line_to_xml(kind, line)?);
    }
    element.push(lines);

    Ok(element)
}

fn line_to_xml(kind: TransactionKind, line: &TransactionLine) -> Result<Element> {
    let mut element = Element::new(LINE)
        .with_attribute("type", line.line_type.as_str())
        .with_attribute("id", line.id.as_str());

    push_optional(&mut element, "dim1", line.dim1.as_deref());
    push_optional(&mut element, "dim2", line.dim2.as_deref());
    push_optional(&mut element, "dim3", line.dim3.as_deref());
    push_optional(&mut element, "value", line.value.map(format_amount));
    push_optional(&mut element, "debitcredit", line.debit_credit.map(|dc| dc.as_str()));
    push_optional(&mut element, "basevalue", line.base_value.map(format_amount));
    push_optional(&mut element, "rate", line.rate.map(format_rate));
    push_optional(&mut element, "repvalue", line.rep_value.map(format_amount));
    push_optional(&mut element, "reprate", line.rep_rate.map(format_rate));
    push_optional(&mut element, "description", line.description.as_deref());
    push_optional(&mut element, "vatcode", line.vat_code.as_deref());
    push_optional(&mut element, "vatvalue", line.vat_value.map(format_amount));
    if line.line_type == LineType::Total {
        push_optional(&mut element, "vattotal", line.vat_total.map(format_amount));
        push_optional(&mut element, "vatbasetotal", line.vat_base_total.map(format_amount));
    }
    if kind.has_performance_fields() {
        push_optional(
            &mut element,
            "performancetype",
            line.performance_type.map(|p| p.as_str()),
        );
        push_optional(
            &mut element,
            "performancecountry",
            line.performance_country.as_deref(),
        );
        push_optional(
            &mut element,
            "performancevatnumber",
            line.performance_vat_number.as_deref(),
        );
        push_optional(
            &mut element,
            "performancedate",
            written_date("performancedate", line.performance_date)?,
        );
    }

    Ok(element)
}

/// Reads a `<transaction>` element as returned by a read request.
pub fn transaction_from_xml(kind: TransactionKind, element: &Element) -> Result<Transaction> {
    if element.name() != TRANSACTION {
        return Err(Error::mapping(
            element.name(),
            "",
            format!("expected <{TRANSACTION}>"),
        ));
    }

    let mut transaction = Transaction::new(kind);
    // responses report the destiny as the location the transaction was stored in
    transaction.destiny = attribute(element, "location")
        .or_else(|| attribute(element, "destiny"))
        .map(|(name, value)| parse_value(name, value))
        .transpose()?;
    transaction.raise_warning = attribute(element, "raisewarning")
        .map(|(name, value)| parse_bool(name, value))
        .transpose()?;
    transaction.auto_balance_vat = attribute(element, "autobalancevat")
        .map(|(name, value)| parse_bool(name, value))
        .transpose()?;

    let header = element
        .child(HEADER)
        .ok_or_else(|| missing(TRANSACTION, HEADER))?;
    transaction.office = string(header, "office");
    transaction.code = string(header, "code");
    transaction.number = parsed(header, "number")?;
    transaction.period = parsed(header, "period")?;
    transaction.currency = string(header, "currency");
    transaction.date = date(header, "date")?;
    transaction.origin = string(header, "origin");
    transaction.free_text_1 = string(header, "freetext1");
    transaction.free_text_2 = string(header, "freetext2");
    transaction.free_text_3 = string(header, "freetext3");
    if kind.has_invoice_fields() {
        transaction.due_date = date(header, "duedate")?;
        transaction.invoice_number = string(header, "invoicenumber");
    }
    if kind.has_payment_reference() {
        transaction.payment_reference = string(header, "paymentreference");
    }
    transaction.origin_reference = string(header, "originreference");

    if let Some(lines) = element.child(LINES) {
        for line in lines.children_named(LINE) {
            transaction.add_line(line_from_xml(kind, line)?)?;
        }
    }

    Ok(transaction)
}

fn line_from_xml(kind: TransactionKind, element: &Element) -> Result<TransactionLine> {
    let (name, value) = attribute(element, "type").ok_or_else(|| missing(LINE, "@type"))?;
    let line_type = parse_value(name, value)?;
    let id = element.attribute("id").ok_or_else(|| missing(LINE, "@id"))?;

    let mut line = TransactionLine::new(line_type, id);
    line.dim1 = string(element, "dim1");
    line.dim2 = string(element, "dim2");
    line.dim3 = string(element, "dim3");
    line.debit_credit = parsed(element, "debitcredit")?;
    line.value = parsed(element, "value")?;
    line.base_value = parsed(element, "basevalue")?;
    line.rate = parsed(element, "rate")?;
    line.rep_value = parsed(element, "repvalue")?;
    line.rep_rate = parsed(element, "reprate")?;
    line.description = string(element, "description");
    line.vat_code = string(element, "vatcode");
    line.vat_value = parsed(element, "vatvalue")?;
    line.vat_total = parsed(element, "vattotal")?;
    line.vat_base_total = parsed(element, "vatbasetotal")?;
    line.match_status = parsed(element, "matchstatus")?;
    line.match_level = parsed(element, "matchlevel")?;
    line.base_value_open = parsed(element, "basevalueopen")?;
    line.value_open = parsed(element, "valueopen")?;
    if kind.has_performance_fields() {
        line.performance_type = parsed(element, "performancetype")?;
        line.performance_country = string(element, "performancecountry");
        line.performance_vat_number = string(element, "performancevatnumber");
        line.performance_date = date(element, "performancedate")?;
    }

    Ok(line)
}

/// Reads every transaction in a response, whether the root is a single `<transaction>` or a
/// `<transactions>` batch.
pub fn transactions_from_response(
    kind: TransactionKind,
    response: &Response,
) -> Result<Vec<Transaction>> {
    let root = response.root();
    match root.name() {
        TRANSACTION => Ok(vec![transaction_from_xml(kind, root)?]),
        TRANSACTIONS => root
            .children_named(TRANSACTION)
            .map(|element| transaction_from_xml(kind, element))
            .collect(),
        other => Err(Error::mapping(
            other,
            "",
            format!("expected <{TRANSACTION}> or <{TRANSACTIONS}>"),
        )),
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn written_date(name: &str, date: Option<Date>) -> Result<Option<String>> {
    date.map(|date| format_date(date).map_err(|e| Error::mapping(name, &date.to_string(), e)))
        .transpose()
}

fn push_optional(parent: &mut Element, name: &str, value: Option<impl Into<String>>) {
    if let Some(value) = value {
        parent.push(Element::new(name).with_text(value));
    }
}

fn missing(parent: &str, element: &str) -> Error {
    Error::MissingElement {
        parent: parent.to_string(),
        element: element.to_string(),
    }
}

fn attribute<'a>(element: &'a Element, name: &'a str) -> Option<(&'a str, &'a str)> {
    element.attribute(name).map(|value| (name, value))
}

fn string(parent: &Element, name: &str) -> Option<String> {
    parent.child_text(name).map(ToString::to_string)
}

fn parse_value<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::mapping(name, value, e))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::mapping(name, value, "expected true or false")),
    }
}

fn parsed<T>(parent: &Element, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match parent.child_text(name) {
        Some(text) if !text.trim().is_empty() => parse_value(name, text).map(Some),
        _ => Ok(None),
    }
}

fn date(parent: &Element, name: &str) -> Result<Option<Date>> {
    match parent.child_text(name) {
        Some(text) if !text.trim().is_empty() => parse_date(text)
            .map(Some)
            .map_err(|e| Error::mapping(name, text, e)),
        _ => Ok(None),
    }
}
