use std::collections::BTreeMap;

use crate::error::{FacturaError, Result};

use super::totals::{compute_totals, format_money};
use super::validate;

/// One (description, amount) row of billed work. The amount stays the string
/// the user typed; totals parse it on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItem {
    pub description: String,
    pub amount: String,
}

/// Editable invoice form: client fields, the ordered line items, the tax rate
/// and the three derived read-only figures.
///
/// Derived fields are recomputed synchronously inside every mutation that can
/// affect them, so they are never stale when a caller reads or snapshots the
/// form.
#[derive(Debug, Clone)]
pub struct InvoiceForm {
    pub client_name: String,
    pub street: String,
    pub postal_code: String,
    pub phone: String,
    pub tax_id: String,
    pub city: String,
    pub line_items: Vec<LineItem>,
    pub tax_rate: String,
    taxable_base: String,
    tax_amount: String,
    total: String,
    errors: BTreeMap<String, String>,
}

/// Immutable copy of the form at generation time, handed to the renderer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub client_name: String,
    pub street: String,
    pub postal_code: String,
    pub phone: String,
    pub tax_id: String,
    pub city: String,
    pub line_items: Vec<LineItem>,
    pub tax_rate: String,
    pub taxable_base: String,
    pub tax_amount: String,
    pub total: String,
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceForm {
    /// A fresh form: one empty line item, 0% tax, totals already derived.
    pub fn new() -> Self {
        let mut form = Self {
            client_name: String::new(),
            street: String::new(),
            postal_code: String::new(),
            phone: String::new(),
            tax_id: String::new(),
            city: String::new(),
            line_items: vec![LineItem::default()],
            tax_rate: "0".to_string(),
            taxable_base: String::new(),
            tax_amount: String::new(),
            total: String::new(),
            errors: BTreeMap::new(),
        };
        form.recompute();
        form
    }

    pub fn taxable_base(&self) -> &str {
        &self.taxable_base
    }

    pub fn tax_amount(&self) -> &str {
        &self.tax_amount
    }

    pub fn total(&self) -> &str {
        &self.total
    }

    /// Current field errors, keyed by field path.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Append an empty line item. It contributes zero until filled in.
    pub fn add_line_item(&mut self) {
        self.line_items.push(LineItem::default());
        self.errors.remove("lines");
        self.recompute();
    }

    /// Remove the line item at `index`.
    ///
    /// Removing the last remaining item is rejected: the item stays and the
    /// rejection is surfaced as a field-level error on `lines`, not as a
    /// fatal error. Returns whether the item was removed.
    pub fn remove_line_item(&mut self, index: usize) -> Result<bool> {
        if index >= self.line_items.len() {
            return Err(FacturaError::LineItemIndex(index));
        }
        if self.line_items.len() == 1 {
            self.errors.insert(
                "lines".to_string(),
                "Agrega al menos un concepto".to_string(),
            );
            return Ok(false);
        }
        self.line_items.remove(index);
        self.errors.remove("lines");
        // Removal shifts the indexes behind `index`; drop the per-line
        // errors rather than keep them under stale keys.
        self.errors.retain(|key, _| !key.starts_with("lines."));
        self.recompute();
        Ok(true)
    }

    /// Set a scalar or line-item field by path (`client.city`, `tax_rate`,
    /// `lines.0.amount`, ...).
    ///
    /// The field is validated immediately and its error state updated, but an
    /// invalid value never blocks the edit. Fields that feed the totals
    /// trigger a synchronous recompute before this returns.
    pub fn set_field(&mut self, path: &str, value: &str) -> Result<()> {
        let affects_totals = match path {
            "client.name" => {
                self.client_name = value.to_string();
                false
            }
            "client.street" => {
                self.street = value.to_string();
                false
            }
            "client.postal_code" => {
                self.postal_code = value.to_string();
                false
            }
            "client.phone" => {
                self.phone = value.to_string();
                false
            }
            "client.tax_id" => {
                self.tax_id = value.to_string();
                false
            }
            "client.city" => {
                self.city = value.to_string();
                false
            }
            "tax_rate" => {
                self.tax_rate = value.to_string();
                true
            }
            other => {
                let (index, field) = parse_line_path(other)?;
                let item = self
                    .line_items
                    .get_mut(index)
                    .ok_or(FacturaError::LineItemIndex(index))?;
                match field {
                    LineField::Description => {
                        item.description = value.to_string();
                        false
                    }
                    LineField::Amount => {
                        item.amount = value.to_string();
                        true
                    }
                }
            }
        };

        if affects_totals {
            self.recompute();
        }
        self.validate_field(path);
        Ok(())
    }

    /// Recompute taxable base, tax amount and total from the current line
    /// items and tax rate. Pure with respect to everything else on the form.
    pub fn recompute(&mut self) {
        let totals = compute_totals(&self.line_items, &self.tax_rate);
        self.taxable_base = format_money(totals.taxable_base);
        self.tax_amount = format_money(totals.tax_amount);
        self.total = format_money(totals.total);
    }

    /// Re-validate every field. Returns whether the form is submittable;
    /// the error map afterwards holds exactly the current failures.
    pub fn validate_all(&mut self) -> bool {
        self.errors.clear();

        self.check("client.name", validate::required(&self.client_name));
        self.check("client.street", validate::required(&self.street));
        self.check("client.postal_code", validate::postal_code(&self.postal_code));
        self.check("client.phone", validate::phone(&self.phone));
        self.check("client.tax_id", validate::required(&self.tax_id));
        self.check("client.city", validate::required(&self.city));
        self.check("tax_rate", validate::required(&self.tax_rate));

        if self.line_items.is_empty() {
            self.errors.insert(
                "lines".to_string(),
                "Agrega al menos un concepto".to_string(),
            );
        }
        let line_errors: Vec<(String, Option<String>)> = self
            .line_items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                [
                    (
                        format!("lines.{i}.description"),
                        validate::line_description(&item.description),
                    ),
                    (format!("lines.{i}.amount"), validate::line_amount(&item.amount)),
                ]
            })
            .collect();
        for (path, error) in line_errors {
            self.check(&path, error);
        }

        self.check("taxable_base", validate::required(&self.taxable_base));
        self.check("tax_amount", validate::required(&self.tax_amount));
        self.check("total", validate::required(&self.total));

        self.errors.is_empty()
    }

    /// Immutable copy of the current values for the renderer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            client_name: self.client_name.clone(),
            street: self.street.clone(),
            postal_code: self.postal_code.clone(),
            phone: self.phone.clone(),
            tax_id: self.tax_id.clone(),
            city: self.city.clone(),
            line_items: self.line_items.clone(),
            tax_rate: self.tax_rate.clone(),
            taxable_base: self.taxable_base.clone(),
            tax_amount: self.tax_amount.clone(),
            total: self.total.clone(),
        }
    }

    fn check(&mut self, path: &str, error: Option<String>) {
        match error {
            Some(message) => {
                self.errors.insert(path.to_string(), message);
            }
            None => {
                self.errors.remove(path);
            }
        }
    }

    fn validate_field(&mut self, path: &str) {
        let error = match path {
            "client.name" => validate::required(&self.client_name),
            "client.street" => validate::required(&self.street),
            "client.postal_code" => validate::postal_code(&self.postal_code),
            "client.phone" => validate::phone(&self.phone),
            "client.tax_id" => validate::required(&self.tax_id),
            "client.city" => validate::required(&self.city),
            "tax_rate" => validate::required(&self.tax_rate),
            other => match parse_line_path(other) {
                Ok((index, LineField::Description)) => self
                    .line_items
                    .get(index)
                    .and_then(|item| validate::line_description(&item.description)),
                Ok((index, LineField::Amount)) => self
                    .line_items
                    .get(index)
                    .and_then(|item| validate::line_amount(&item.amount)),
                Err(_) => None,
            },
        };
        self.check(path, error);
    }
}

enum LineField {
    Description,
    Amount,
}

/// Parse `lines.<index>.<description|amount>`.
fn parse_line_path(path: &str) -> Result<(usize, LineField)> {
    let unknown = || FacturaError::UnknownField(path.to_string());

    let rest = path.strip_prefix("lines.").ok_or_else(unknown)?;
    let (index_str, field_str) = rest.split_once('.').ok_or_else(unknown)?;
    let index: usize = index_str.parse().map_err(|_| unknown())?;
    let field = match field_str {
        "description" => LineField::Description,
        "amount" => LineField::Amount,
        _ => return Err(unknown()),
    };
    Ok((index, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> InvoiceForm {
        let mut form = InvoiceForm::new();
        form.set_field("client.name", "Acme SL").unwrap();
        form.set_field("client.street", "C/ Mayor 1").unwrap();
        form.set_field("client.postal_code", "28001").unwrap();
        form.set_field("client.phone", "600123456").unwrap();
        form.set_field("client.tax_id", "B12345678").unwrap();
        form.set_field("client.city", "Madrid").unwrap();
        form.set_field("lines.0.description", "Labor").unwrap();
        form.set_field("lines.0.amount", "100.00").unwrap();
        form
    }

    #[test]
    fn new_form_starts_with_one_empty_line_and_zero_totals() {
        let form = InvoiceForm::new();
        assert_eq!(form.line_items.len(), 1);
        assert_eq!(form.tax_rate, "0");
        assert_eq!(form.taxable_base(), "0.00");
        assert_eq!(form.tax_amount(), "0.00");
        assert_eq!(form.total(), "0.00");
    }

    #[test]
    fn amount_edits_recompute_totals_synchronously() {
        let mut form = filled_form();
        assert_eq!(form.taxable_base(), "100.00");

        form.add_line_item();
        form.set_field("lines.1.description", "Materials").unwrap();
        form.set_field("lines.1.amount", "50.005").unwrap();
        form.set_field("tax_rate", "21").unwrap();

        assert_eq!(form.taxable_base(), "150.01");
        assert_eq!(form.tax_amount(), "31.50");
        assert_eq!(form.total(), "181.51");
    }

    #[test]
    fn empty_line_contributes_zero_until_filled() {
        let mut form = filled_form();
        form.add_line_item();
        assert_eq!(form.taxable_base(), "100.00");
    }

    #[test]
    fn removing_a_line_recomputes() {
        let mut form = filled_form();
        form.add_line_item();
        form.set_field("lines.1.amount", "25.00").unwrap();
        assert_eq!(form.taxable_base(), "125.00");

        assert!(form.remove_line_item(1).unwrap());
        assert_eq!(form.taxable_base(), "100.00");
    }

    #[test]
    fn removing_the_last_line_is_rejected_with_a_field_error() {
        let mut form = filled_form();
        assert!(!form.remove_line_item(0).unwrap());
        assert_eq!(form.line_items.len(), 1);
        assert!(form.errors().contains_key("lines"));

        // The rejection is not fatal: the form still validates once the
        // field error is the only complaint left.
        assert!(form.validate_all());
    }

    #[test]
    fn removing_out_of_range_is_an_error() {
        let mut form = filled_form();
        assert!(matches!(
            form.remove_line_item(5),
            Err(FacturaError::LineItemIndex(5))
        ));
    }

    #[test]
    fn unknown_paths_are_rejected() {
        let mut form = InvoiceForm::new();
        assert!(matches!(
            form.set_field("client.nif", "x"),
            Err(FacturaError::UnknownField(_))
        ));
        assert!(matches!(
            form.set_field("lines.0.euros", "1"),
            Err(FacturaError::UnknownField(_))
        ));
        assert!(matches!(
            form.set_field("lines.9.amount", "1"),
            Err(FacturaError::LineItemIndex(9))
        ));
    }

    #[test]
    fn invalid_field_does_not_block_other_edits() {
        let mut form = filled_form();
        form.set_field("client.postal_code", "1234").unwrap();
        assert!(form.errors().contains_key("client.postal_code"));

        // Other fields stay editable and valid.
        form.set_field("client.city", "Sevilla").unwrap();
        assert!(!form.errors().contains_key("client.city"));

        form.set_field("client.postal_code", "41001").unwrap();
        assert!(!form.errors().contains_key("client.postal_code"));
    }

    #[test]
    fn validate_all_flags_digit_rules() {
        let mut form = filled_form();
        form.set_field("client.postal_code", "1234").unwrap();
        form.set_field("client.phone", "12345678").unwrap();
        assert!(!form.validate_all());
        assert!(form.errors().contains_key("client.postal_code"));
        assert!(form.errors().contains_key("client.phone"));

        form.set_field("client.postal_code", "12345").unwrap();
        form.set_field("client.phone", "123456789").unwrap();
        assert!(form.validate_all());
    }

    #[test]
    fn validate_all_flags_empty_line_fields() {
        let mut form = filled_form();
        form.add_line_item();
        assert!(!form.validate_all());
        assert!(form.errors().contains_key("lines.1.description"));
        assert!(form.errors().contains_key("lines.1.amount"));
    }

    #[test]
    fn snapshot_carries_current_derived_values() {
        let mut form = filled_form();
        form.set_field("tax_rate", "21").unwrap();
        let snapshot = form.snapshot();
        assert_eq!(snapshot.taxable_base, "100.00");
        assert_eq!(snapshot.tax_amount, "21.00");
        assert_eq!(snapshot.total, "121.00");
        assert_eq!(snapshot.client_name, "Acme SL");
        assert_eq!(snapshot.line_items.len(), 1);
    }
}
