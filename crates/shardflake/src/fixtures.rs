//! Entity types shared by unit tests.

use crate::{Entity, FieldAccessor, FieldDef, PartitioningConfig, TimeUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub customer: String,
}

impl Order {
    pub fn new(id: i64, customer: &str) -> Self {
        Self {
            id,
            customer: customer.to_owned(),
        }
    }
}

fn order_id(order: &Order) -> i64 {
    order.id
}

fn set_order_id(order: &mut Order, id: i64) {
    order.id = id;
}

fn order_customer(order: &Order) -> &str {
    &order.customer
}

impl Entity for Order {
    fn table_name() -> &'static str {
        "Orders"
    }

    fn fields() -> &'static [FieldDef<Self>] {
        const FIELDS: &[FieldDef<Order>] = &[
            FieldDef::generated_key("id", order_id, set_order_id),
            FieldDef::text("customer", order_customer),
        ];
        FIELDS
    }

    fn partitioning() -> PartitioningConfig {
        PartitioningConfig::time_based(TimeUnit::Monthly)
    }
}

/// Declares a plain primary key before the generated one.
#[derive(Debug)]
pub struct Invoice {
    pub invoice_id: i64,
    pub external_ref: i64,
    pub number: i64,
}

fn invoice_number(invoice: &Invoice) -> i64 {
    invoice.number
}

fn invoice_id(invoice: &Invoice) -> i64 {
    invoice.invoice_id
}

fn set_invoice_id(invoice: &mut Invoice, id: i64) {
    invoice.invoice_id = id;
}

fn invoice_external_ref(invoice: &Invoice) -> i64 {
    invoice.external_ref
}

fn set_invoice_external_ref(invoice: &mut Invoice, id: i64) {
    invoice.external_ref = id;
}

impl Entity for Invoice {
    fn table_name() -> &'static str {
        "Invoices"
    }

    fn fields() -> &'static [FieldDef<Self>] {
        const FIELDS: &[FieldDef<Invoice>] = &[
            FieldDef::primary_key("number", FieldAccessor::Int(invoice_number)),
            FieldDef::generated("external_ref", invoice_external_ref, set_invoice_external_ref),
            FieldDef::generated_key("invoice_id", invoice_id, set_invoice_id),
        ];
        FIELDS
    }
}

/// A plain text primary key next to a generator-typed reference.
#[derive(Debug)]
pub struct Shipment {
    pub tracking_code: String,
    pub shipment_ref: i64,
}

fn shipment_tracking_code(shipment: &Shipment) -> &str {
    &shipment.tracking_code
}

fn shipment_ref(shipment: &Shipment) -> i64 {
    shipment.shipment_ref
}

fn set_shipment_ref(shipment: &mut Shipment, id: i64) {
    shipment.shipment_ref = id;
}

impl Entity for Shipment {
    fn table_name() -> &'static str {
        "Shipments"
    }

    fn fields() -> &'static [FieldDef<Self>] {
        const FIELDS: &[FieldDef<Shipment>] = &[
            FieldDef::primary_key("tracking_code", FieldAccessor::Text(shipment_tracking_code)),
            FieldDef::generated("shipment_ref", shipment_ref, set_shipment_ref),
        ];
        FIELDS
    }
}

/// Keyed by a plain primary key only.
#[derive(Debug)]
pub struct AuditLog {
    pub log_id: i64,
}

fn audit_log_id(log: &AuditLog) -> i64 {
    log.log_id
}

impl Entity for AuditLog {
    fn table_name() -> &'static str {
        "AuditLogs"
    }

    fn fields() -> &'static [FieldDef<Self>] {
        const FIELDS: &[FieldDef<AuditLog>] =
            &[FieldDef::primary_key("log_id", FieldAccessor::Int(audit_log_id))];
        FIELDS
    }
}

/// Declares no key field at all.
#[derive(Debug)]
pub struct Note {
    pub body: String,
}

fn note_body(note: &Note) -> &str {
    &note.body
}

impl Entity for Note {
    fn table_name() -> &'static str {
        "Notes"
    }

    fn fields() -> &'static [FieldDef<Self>] {
        const FIELDS: &[FieldDef<Note>] = &[FieldDef::text("body", note_body)];
        FIELDS
    }

    fn partitioning() -> PartitioningConfig {
        PartitioningConfig::time_based(TimeUnit::Daily)
    }
}

/// Keyed by text.
#[derive(Debug)]
pub struct Customer {
    pub email: String,
    pub region: String,
}

fn customer_email(customer: &Customer) -> &str {
    &customer.email
}

fn customer_region(customer: &Customer) -> &str {
    &customer.region
}

impl Entity for Customer {
    fn table_name() -> &'static str {
        "Customers"
    }

    fn fields() -> &'static [FieldDef<Self>] {
        const FIELDS: &[FieldDef<Customer>] = &[
            FieldDef::primary_key("email", FieldAccessor::Text(customer_email)),
            FieldDef::text("region", customer_region),
        ];
        FIELDS
    }

    fn partitioning() -> PartitioningConfig {
        PartitioningConfig::quantity_based(8)
    }
}
