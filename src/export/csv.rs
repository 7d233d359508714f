// Orders table export

use super::{approval_label, file_date, format_cents, format_timestamp, yes_no, ExportFile};
use crate::domain::{DecisionFilter, Order};
use chrono::{DateTime, Utc};

pub const CONTENT_TYPE: &str = "text/csv;charset=utf-8";

const BOM: &str = "\u{FEFF}";

const HEADERS: [&str; 31] = [
    "Order ID",
    "Loja",
    "Plataforma",
    "Valor",
    "Moeda",
    "Decisão",
    "Tag",
    "Aprovação",
    "Origem",
    "Destino",
    "Score",
    "Status",
    "Customer ID",
    "Nome do Cliente",
    "Email",
    "Telefone",
    "Score Grade",
    "Tem Biometria",
    "Número de Pedidos",
    "Número de Chargebacks",
    "Número de Refunds",
    "IP",
    "Código do País (IP)",
    "Cidade (IP)",
    "ASN",
    "VPN Detectado",
    "Proxy Detectado",
    "Tor Detectado",
    "Bot Detectado",
    "Data de Criação",
    "Última Atualização",
];

/// The search box and decision dropdown of the orders table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: String,
    pub decision: DecisionFilter,
}

impl OrderFilter {
    pub fn new(search: impl Into<String>, decision: DecisionFilter) -> Self {
        Self {
            search: search.into(),
            decision,
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        if !self.decision.matches(order.decision()) {
            return false;
        }

        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        order.platform_order_id.to_lowercase().contains(&query)
            || order.store_display_name().to_lowercase().contains(&query)
    }
}

/// Orders the table would show for `filter`, in their original order
pub fn filter_orders<'a>(orders: &'a [Order], filter: &OrderFilter) -> Vec<&'a Order> {
    orders.iter().filter(|order| filter.matches(order)).collect()
}

/// True when nothing would be exported; callers warn instead of downloading
pub fn is_empty_selection(orders: &[Order], filter: &OrderFilter) -> bool {
    !orders.iter().any(|order| filter.matches(order))
}

/// Quote a field when it contains a comma, a quote or a newline
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row(order: &Order, utc_offset_minutes: i32) -> Vec<String> {
    let customer = &order.customer;
    let risk = order.risk_results.clone().unwrap_or_default();
    let text = |value: Option<&str>| value.unwrap_or_default().to_string();

    vec![
        order.platform_order_id.clone(),
        order.store_display_name().to_string(),
        order.platform.clone(),
        format_cents(order.total_price_cents),
        text(order.currency.as_deref()),
        order.decision().label().to_string(),
        order.tag.clone(),
        approval_label(order.approved_by.as_deref()),
        text(customer.country_last.as_deref()),
        text(order.country_dest_code.as_deref()),
        text(order.score_grade()),
        order.status.clone(),
        text(customer.platform_customer_id.as_deref()),
        customer.name.clone(),
        text(customer.email.as_deref()),
        text(customer.phone.as_deref()),
        text(customer.score_grade.as_deref()),
        yes_no(customer.has_biometry).to_string(),
        customer.orders_count.unwrap_or(0).to_string(),
        customer.chargeback_count.unwrap_or(0).to_string(),
        customer.refund_count.unwrap_or(0).to_string(),
        risk.ip,
        risk.ip_country_code,
        risk.ip_city,
        risk.ip_asn.unwrap_or_default(),
        yes_no(risk.vpn_detected).to_string(),
        yes_no(risk.proxy_detected).to_string(),
        yes_no(risk.tor_detected).to_string(),
        yes_no(risk.bot_detected).to_string(),
        format_timestamp(&order.created_at, utc_offset_minutes),
        format_timestamp(&order.updated_at, utc_offset_minutes),
    ]
}

/// CSV text (BOM included) for the orders matching `filter`
pub fn render_csv(orders: &[Order], filter: &OrderFilter, utc_offset_minutes: i32) -> String {
    let mut lines = Vec::with_capacity(orders.len() + 1);
    lines.push(HEADERS.join(","));
    for order in filter_orders(orders, filter) {
        let fields: Vec<String> = row(order, utc_offset_minutes)
            .iter()
            .map(|field| escape(field))
            .collect();
        lines.push(fields.join(","));
    }

    format!("{}{}", BOM, lines.join("\n"))
}

/// Build `pedidos-YYYY-MM-DD.csv`. An empty selection still yields a
/// header-only file.
pub fn export_orders_csv(
    orders: &[Order],
    filter: &OrderFilter,
    utc_offset_minutes: i32,
    now: DateTime<Utc>,
) -> ExportFile {
    let content = render_csv(orders, filter, utc_offset_minutes);
    ExportFile {
        file_name: format!("pedidos-{}.csv", file_date(&now)),
        content_type: CONTENT_TYPE,
        bytes: content.into_bytes(),
    }
}
