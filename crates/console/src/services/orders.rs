//! Order submission workflow.
//!
//! Takes the posted form, validates it as a whole, assembles a local
//! [`OrderDraft`], and commits it to the commerce platform in a single step.
//! The outcome is an explicit return value; nothing about an in-progress
//! order lives outside this function, so a failure anywhere leaves the
//! platform untouched.

use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use order_desk_core::{Email, Money, Phone, PhoneError, ProductId, VariationId};

use crate::commerce::{Commerce, CommerceError, DraftLine, OrderAddress, OrderDraft, PlacedOrder};

/// Prior orders older than this window flag the customer as a repeat buyer;
/// anything younger is treated as a duplicate submission and not flagged.
const REPEAT_COOLDOWN_SECS: i64 = 60;

/// The order form as posted by the console page.
///
/// Every field arrives as a string; `products` is a JSON array of selected
/// lines maintained client-side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub lname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
    /// JSON array of `{id, variation_id, quantity}` entries.
    #[serde(default)]
    pub products: String,
    /// Per-session authenticity token; checked by the route before the
    /// workflow runs.
    #[serde(default)]
    pub token: String,
}

/// One selected line as encoded by the client.
#[derive(Debug, Deserialize)]
struct SubmittedLine {
    id: i64,
    #[serde(default)]
    variation_id: Option<i64>,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// A decoded, merged order line request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLine {
    pub product_id: ProductId,
    pub variation_id: Option<VariationId>,
    pub quantity: u32,
}

/// Failure modes of a submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The form failed validation; carries the full message list.
    #[error("order form failed validation")]
    Invalid(Vec<String>),

    /// Every submitted line failed to resolve to a purchasable item.
    #[error("no purchasable products in the selected lines")]
    NoPurchasableProducts,

    /// The platform rejected or failed the commit.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

/// The validated content of an order form.
struct ValidOrder {
    phone: Phone,
    email: Option<Email>,
    first_name: String,
    last_name: String,
    company: Option<String>,
    address_1: String,
    landmark: String,
    city: String,
    state: String,
    postcode: String,
    country: String,
    lines: Vec<RequestedLine>,
}

impl ValidOrder {
    fn address(&self) -> OrderAddress {
        OrderAddress {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            address_1: self.address_1.clone(),
            address_2: self.landmark.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postcode: self.postcode.clone(),
            country: self.country.clone(),
            phone: self.phone.as_str().to_string(),
            email: self.email.as_ref().map(|e| e.as_str().to_string()),
        }
    }
}

/// Parse and validate the form into a [`ValidOrder`].
///
/// All rules are checked before rejecting; the error side carries the
/// complete message list, not just the first failure.
fn parse_form(form: &OrderForm) -> Result<ValidOrder, Vec<String>> {
    let mut errors = Vec::new();

    let phone = match Phone::parse(&form.phone) {
        Ok(phone) => Some(phone),
        Err(e) => {
            errors.push(phone_message(&e));
            None
        }
    };

    let required = [
        (&form.fname, "First name"),
        (&form.lname, "Last name"),
        (&form.address_1, "Street address"),
        (&form.landmark, "Landmark / area"),
        (&form.city, "City"),
        (&form.state, "State"),
        (&form.postcode, "Postcode"),
        (&form.country, "Country"),
    ];
    for (value, label) in required {
        if value.trim().is_empty() {
            errors.push(format!("{label} is required."));
        }
    }

    let lines = decode_lines(&form.products);
    if lines.is_empty() {
        errors.push("Please select at least one product.".to_string());
    }

    let email = match form.email.trim() {
        "" => None,
        raw => match Email::parse(raw) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push("Please enter a valid email address.".to_string());
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // phone is always Some here: a parse failure pushed an error above.
    let Some(phone) = phone else {
        return Err(vec![phone_message(&PhoneError::Empty)]);
    };

    Ok(ValidOrder {
        phone,
        email,
        first_name: form.fname.trim().to_string(),
        last_name: form.lname.trim().to_string(),
        company: match form.company.trim() {
            "" => None,
            c => Some(c.to_string()),
        },
        address_1: form.address_1.trim().to_string(),
        landmark: form.landmark.trim().to_string(),
        city: form.city.trim().to_string(),
        state: form.state.trim().to_string(),
        postcode: form.postcode.trim().to_string(),
        country: form.country.trim().to_string(),
        lines,
    })
}

fn phone_message(error: &PhoneError) -> String {
    match error {
        PhoneError::Empty => "Phone number is required.".to_string(),
        PhoneError::WrongLength => "Phone number must be exactly 10 digits.".to_string(),
        PhoneError::LeadingZero => "Phone number must not start with 0.".to_string(),
    }
}

/// Decode the posted product lines, skipping entries that do not decode,
/// and merge duplicates.
fn decode_lines(raw: &str) -> Vec<RequestedLine> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw).unwrap_or_default();

    let decoded = entries.into_iter().filter_map(|entry| {
        let line: SubmittedLine = serde_json::from_value(entry).ok()?;
        Some(RequestedLine {
            product_id: ProductId::new(line.id),
            // The client sends 0 for "no variation".
            variation_id: line.variation_id.filter(|&v| v != 0).map(VariationId::new),
            quantity: line.quantity.max(1),
        })
    });

    merge_lines(decoded)
}

/// Collapse duplicate `(product, variation)` keys by summing quantities,
/// preserving first-seen order.
fn merge_lines(lines: impl Iterator<Item = RequestedLine>) -> Vec<RequestedLine> {
    let mut merged: Vec<RequestedLine> = Vec::new();
    for line in lines {
        match merged
            .iter_mut()
            .find(|l| l.product_id == line.product_id && l.variation_id == line.variation_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

/// Run the submission workflow against the commerce platform.
///
/// Validates the form, resolves each requested line (skipping and logging
/// unresolvable ones), assembles the draft locally, and commits it in one
/// step. On any error nothing has been persisted.
///
/// # Errors
///
/// - [`SubmitError::Invalid`] with the full message list when validation fails
/// - [`SubmitError::NoPurchasableProducts`] when no line resolved
/// - [`SubmitError::Commerce`] when a platform call fails
#[instrument(skip(commerce, form))]
pub async fn submit_order(
    commerce: &dyn Commerce,
    form: &OrderForm,
) -> Result<PlacedOrder, SubmitError> {
    let valid = parse_form(form).map_err(SubmitError::Invalid)?;

    // Reuse an existing customer identity when the phone matches exactly;
    // otherwise this becomes a guest order.
    let customer_id = commerce.customer_by_phone(&valid.phone).await?;

    let mut lines = Vec::new();
    let mut total = Money::ZERO;
    for requested in &valid.lines {
        match commerce
            .resolve_item(requested.product_id, requested.variation_id)
            .await?
        {
            Some(item) => {
                let subtotal = item.unit_price.times(requested.quantity);
                total = total + subtotal;
                lines.push(DraftLine {
                    product_id: item.product_id,
                    variation_id: item.variation_id,
                    name: item.name,
                    quantity: requested.quantity,
                    unit_price: item.unit_price,
                    subtotal,
                });
            }
            None => {
                tracing::warn!(
                    product_id = %requested.product_id,
                    variation_id = ?requested.variation_id,
                    "skipping unresolvable order line"
                );
            }
        }
    }

    if lines.is_empty() {
        return Err(SubmitError::NoPurchasableProducts);
    }

    // Advisory metadata only; a failed history lookup must not lose the order.
    let repeat_customer = match commerce.latest_order_placed_at(&valid.phone).await {
        Ok(Some(placed_at)) => Utc::now() - placed_at > TimeDelta::seconds(REPEAT_COOLDOWN_SECS),
        Ok(None) => false,
        Err(e) => {
            tracing::warn!("order history lookup failed: {e}");
            false
        }
    };

    let draft = OrderDraft {
        customer_id,
        lines,
        address: valid.address(),
        payment_method: "cod",
        payment_method_title: "Cash on Delivery",
        status: "processing",
        total,
        created_via: "order-desk",
        note: "Order placed via the order desk.",
        repeat_customer,
    };

    let placed = commerce.place_order(draft).await?;
    tracing::info!(order_id = %placed.id, total = %placed.total, "order placed");
    Ok(placed)
}
