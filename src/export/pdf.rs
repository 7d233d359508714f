// Single-order PDF report.
//
// The report is laid out first as plain data (pages of positioned text,
// lines, boxes and images, in millimetres from the top-left corner) and then
// drawn with printpdf. Coordinates flip to PDF's bottom-left origin only at
// render time.

use super::{
    approval_label, file_date, format_cents, format_generated_at, format_timestamp, yes_no,
    ExportError, ExportFile, NOT_INFORMED,
};
use crate::config::ExportConfig;
use crate::domain::Order;
use chrono::{DateTime, Utc};
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};
use std::sync::Arc;
use std::time::Duration;

pub const CONTENT_TYPE: &str = "application/pdf";

// A4, millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const VALUE_OFFSET: f32 = 80.0;
const FIELD_LINE_HEIGHT: f32 = 6.0;
const PT_TO_MM: f32 = 0.3528;
// Helvetica averages roughly half an em per glyph
const AVG_GLYPH_EM: f32 = 0.5;

const LOGO_WIDTH: f32 = 60.0;
const BIOMETRY_MAX_WIDTH: f32 = 80.0;
const BIOMETRY_MAX_HEIGHT: f32 = 60.0;

const BLACK: f32 = 0.0;
const RULE_GRAY: f32 = 0.5;
const PLACEHOLDER_GRAY: f32 = 0.78;
const PLACEHOLDER_TEXT_GRAY: f32 = 0.59;

// ============================================================================
// Layout model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One drawable item. `gray` runs from 0 (black) to 1 (white).
#[derive(Debug, Clone)]
pub enum PdfElement {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        align: Align,
        gray: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        gray: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        gray: f32,
    },
    Image {
        image: Arc<DynamicImage>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    pub elements: Vec<PdfElement>,
}

impl PdfPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            PdfElement::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PdfDocumentLayout {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<PdfPage>,
}

impl PdfDocumentLayout {
    /// Every text run in reading order, across pages
    pub fn texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|page| page.texts()).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages
            .iter()
            .any(|page| page.texts().any(|text| text == needle))
    }
}

/// Images fetched before layout
#[derive(Debug, Clone)]
pub enum BiometryImage {
    /// The customer has biometry but no image URL is known
    Missing,
    Loaded(Arc<DynamicImage>),
    /// A URL was present but the image could not be fetched or decoded
    Failed,
}

#[derive(Debug, Clone)]
pub struct ReportAssets {
    pub logo: Option<Arc<DynamicImage>>,
    pub biometry: BiometryImage,
}

impl Default for ReportAssets {
    fn default() -> Self {
        Self {
            logo: None,
            biometry: BiometryImage::Missing,
        }
    }
}

// ============================================================================
// Text measurement
// ============================================================================

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * PT_TO_MM * AVG_GLYPH_EM
}

/// Greedy word wrap; words wider than a line are split by character
fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for ch in word.chars() {
            current.push(ch);
            if text_width(&current, size) > max_width && current.chars().count() > 1 {
                let overflow = current.pop();
                lines.push(std::mem::take(&mut current));
                current.extend(overflow);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// Layout builder
// ============================================================================

struct LayoutBuilder {
    y: f32,
    pages: Vec<PdfPage>,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self {
            y: MARGIN,
            pages: vec![PdfPage::default()],
        }
    }

    fn push(&mut self, element: PdfElement) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Start a new page when `required` more millimetres would overflow
    fn ensure_space(&mut self, required: f32) {
        if self.y + required > PAGE_HEIGHT - MARGIN {
            self.pages.push(PdfPage::default());
            self.y = MARGIN;
        }
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, style: FontStyle) {
        self.push(PdfElement::Text {
            text: text.into(),
            x,
            y,
            size,
            style,
            align: Align::Left,
            gray: BLACK,
        });
    }

    fn aligned_text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, style: FontStyle, align: Align, gray: f32) {
        self.push(PdfElement::Text {
            text: text.into(),
            x,
            y,
            size,
            style,
            align,
            gray,
        });
    }

    fn rule(&mut self, y: f32, gray: f32) {
        self.push(PdfElement::Line {
            x1: MARGIN,
            y1: y,
            x2: PAGE_WIDTH - MARGIN,
            y2: y,
            width: 0.5,
            gray,
        });
    }

    fn section_title(&mut self, title: &str) {
        self.ensure_space(15.0);
        self.text(title, MARGIN, self.y, 14.0, FontStyle::Bold);
        self.y += 10.0;
        self.rule(self.y, RULE_GRAY);
        self.y += 8.0;
    }

    /// `Label:` in bold, then the value wrapped in the right-hand column
    fn field(&mut self, label: &str, value: Option<&str>) {
        self.ensure_space(8.0);
        let value_x = MARGIN + VALUE_OFFSET;
        self.text(format!("{}:", label), MARGIN, self.y, 10.0, FontStyle::Bold);

        match value.filter(|v| !v.trim().is_empty()) {
            Some(value) => {
                let lines = wrap_text(value, PAGE_WIDTH - value_x - MARGIN, 10.0);
                let count = lines.len();
                for (i, line) in lines.into_iter().enumerate() {
                    let y = self.y + i as f32 * FIELD_LINE_HEIGHT;
                    self.text(line, value_x, y, 10.0, FontStyle::Normal);
                }
                self.y += count as f32 * FIELD_LINE_HEIGHT;
            }
            None => {
                self.text(NOT_INFORMED, value_x, self.y, 10.0, FontStyle::Normal);
                self.y += FIELD_LINE_HEIGHT;
            }
        }
        self.y += 2.0;
    }

    fn bullet_list(&mut self, heading: &str, items: &[String]) {
        self.ensure_space(15.0);
        self.text(heading, MARGIN, self.y, 12.0, FontStyle::Bold);
        self.y += 8.0;
        for item in items {
            self.ensure_space(8.0);
            self.text(format!("• {}", item), MARGIN + 10.0, self.y, 10.0, FontStyle::Normal);
            self.y += 6.0;
        }
    }

    fn italic_line(&mut self, text: &str) {
        self.ensure_space(10.0);
        self.text(text, MARGIN, self.y, 10.0, FontStyle::Italic);
        self.y += 10.0;
    }

    /// Stamp `Página N de M` on every page
    fn finish(mut self, title: String) -> PdfDocumentLayout {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.elements.push(PdfElement::Text {
                text: format!("Página {} de {}", index + 1, total),
                x: PAGE_WIDTH / 2.0,
                y: PAGE_HEIGHT - 10.0,
                size: 8.0,
                style: FontStyle::Normal,
                align: Align::Center,
                gray: BLACK,
            });
        }

        PdfDocumentLayout {
            title,
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            pages: self.pages,
        }
    }
}

fn image_size(image: &DynamicImage, max_width: f32, max_height: Option<f32>) -> (f32, f32) {
    let (w, h) = image.dimensions();
    let aspect = if w == 0 { 1.0 } else { h as f32 / w as f32 };
    let mut width = max_width;
    let mut height = max_width * aspect;
    if let Some(max_height) = max_height {
        if height > max_height && aspect > 0.0 {
            height = max_height;
            width = height / aspect;
        }
    }
    (width, height)
}

/// Lay out the report for `order`
pub fn build_order_layout(
    order: &Order,
    assets: &ReportAssets,
    now: &DateTime<Utc>,
    utc_offset_minutes: i32,
) -> PdfDocumentLayout {
    let mut b = LayoutBuilder::new();

    // Header
    match &assets.logo {
        Some(logo) => {
            let (width, height) = image_size(logo, LOGO_WIDTH, None);
            b.push(PdfElement::Image {
                image: Arc::clone(logo),
                x: MARGIN,
                y: 15.0,
                width,
                height,
            });
            b.y = 35.0;
        }
        None => {
            b.text("LUMUS", MARGIN, 22.0, 18.0, FontStyle::Bold);
            b.y = 28.0;
        }
    }
    b.aligned_text("Relatório de Pedido", PAGE_WIDTH - MARGIN, 22.0, 18.0, FontStyle::Bold, Align::Right, BLACK);
    b.aligned_text(
        format!("Gerado em: {}", format_generated_at(now, utc_offset_minutes)),
        PAGE_WIDTH - MARGIN,
        30.0,
        10.0,
        FontStyle::Normal,
        Align::Right,
        BLACK,
    );
    b.y = b.y.max(35.0);
    b.rule(b.y, BLACK);
    b.y += 15.0;

    // Order
    b.section_title("Informações do Pedido");
    b.field("Order ID", Some(&order.platform_order_id));
    b.field("Plataforma", Some(&order.platform));
    b.field("Loja", Some(order.store_display_name()));
    b.field("Status", Some(&order.status));
    b.field("Tag", Some(&order.tag));
    b.field("Aprovação", Some(&approval_label(order.approved_by.as_deref())));
    b.field("Itens", Some(&order.items.join(", ")));
    let total = format!(
        "{} {}",
        order.currency.as_deref().filter(|c| !c.is_empty()).unwrap_or("$"),
        format_cents(order.total_price_cents)
    );
    b.field("Valor Total", Some(&total));
    b.field("País de Destino", order.country_dest_code.as_deref());
    b.field(
        "Score do Pedido",
        Some(order.customer.score_grade.as_deref().filter(|g| !g.is_empty()).unwrap_or("Não disponível")),
    );
    b.field("Data de Criação", Some(&format_timestamp(&order.created_at, utc_offset_minutes)));
    b.field("Última Atualização", Some(&format_timestamp(&order.updated_at, utc_offset_minutes)));
    b.y += 5.0;

    // Customer
    let customer = &order.customer;
    b.section_title("Informações do Cliente");
    b.field("Customer ID", customer.platform_customer_id.as_deref());
    b.field("Nome", Some(&customer.name));
    b.field("Email", customer.email.as_deref());
    b.field("Telefone", customer.phone.as_deref());
    b.field("País", customer.country_last.as_deref());
    b.field("Score Grade", customer.score_grade.as_deref());
    b.field("Tem Biometria", Some(yes_no(customer.has_biometry)));
    b.field("Número de Pedidos", Some(&customer.orders_count.unwrap_or(0).to_string()));
    b.field("Número de Chargebacks", Some(&customer.chargeback_count.unwrap_or(0).to_string()));
    b.field("Número de Refunds", Some(&customer.refund_count.unwrap_or(0).to_string()));
    b.y += 5.0;

    // Biometry
    if customer.has_biometry {
        b.section_title("Imagem de Biometria");
        match &assets.biometry {
            BiometryImage::Missing => {
                b.ensure_space(70.0);
                let (width, height) = (BIOMETRY_MAX_WIDTH, BIOMETRY_MAX_HEIGHT);
                let top = b.y;
                b.push(PdfElement::Rect {
                    x: MARGIN,
                    y: top,
                    width,
                    height,
                    line_width: 1.0,
                    gray: PLACEHOLDER_GRAY,
                });
                let center_x = MARGIN + width / 2.0;
                b.aligned_text("Espaço reservado para", center_x, top + height / 2.0 - 5.0, 10.0, FontStyle::Italic, Align::Center, PLACEHOLDER_TEXT_GRAY);
                b.aligned_text("imagem de biometria", center_x, top + height / 2.0 + 5.0, 10.0, FontStyle::Italic, Align::Center, PLACEHOLDER_TEXT_GRAY);
                b.y += height + 10.0;
            }
            BiometryImage::Loaded(image) => {
                let (width, height) = image_size(image, BIOMETRY_MAX_WIDTH, Some(BIOMETRY_MAX_HEIGHT));
                b.ensure_space(height + 10.0);
                b.push(PdfElement::Image {
                    image: Arc::clone(image),
                    x: MARGIN,
                    y: b.y,
                    width,
                    height,
                });
                b.y += height + 10.0;
            }
            BiometryImage::Failed => b.italic_line("Erro ao carregar imagem de biometria"),
        }
        b.y += 5.0;
    }

    // Risk
    b.section_title("Análise de Risco");
    match order.risk_results.as_ref().filter(|_| order.is_risk_analyzed()) {
        Some(risk) => {
            b.field("IP", Some(&risk.ip));
            b.field("Código do País (IP)", Some(&risk.ip_country_code));
            b.field("Continente (IP)", Some(&risk.ip_continent));
            b.field("Cidade (IP)", Some(&risk.ip_city));
            b.field("ASN", risk.ip_asn.as_deref());
            b.field("VPN Detectado", Some(yes_no(risk.vpn_detected)));
            b.field("Proxy Detectado", Some(yes_no(risk.proxy_detected)));
            b.field("Tipo de Proxy", Some(&risk.proxy_type.to_uppercase()));
            b.field("Tor Detectado", Some(yes_no(risk.tor_detected)));
            b.field("Bot Detectado", Some(yes_no(risk.bot_detected)));
            b.field("Biometria Necessária", Some(yes_no(risk.biometry_needed)));
            b.field("Decisão", Some(&risk.decision));
            b.y += 5.0;

            if !risk.score_penalties.is_empty() {
                b.bullet_list("Penalidades:", &risk.score_penalties);
                b.y += 3.0;
            }
            if !risk.score_bonuses.is_empty() {
                b.bullet_list("Bônus:", &risk.score_bonuses);
            }
        }
        None => b.italic_line("Análise ainda em andamento..."),
    }

    b.finish(format!("Pedido {}", order.platform_order_id))
}

// ============================================================================
// Asset loading
// ============================================================================

/// Fetch and decode an image, giving up after `timeout_ms`
pub async fn fetch_image(
    http: &reqwest::Client,
    url: &str,
    timeout_ms: u64,
) -> Result<DynamicImage, ExportError> {
    let load = async {
        let response = http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::ImageStatus(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        image_crate::load_from_memory(&bytes).map_err(|e| ExportError::ImageDecode(e.to_string()))
    };

    tokio::time::timeout(Duration::from_millis(timeout_ms), load)
        .await
        .map_err(|_| ExportError::ImageTimeout(timeout_ms))?
}

/// Load the logo and, when the customer has biometry, the capture image.
/// Failures degrade to the text logo or the error line.
pub async fn load_assets(http: &reqwest::Client, order: &Order, config: &ExportConfig) -> ReportAssets {
    let logo = match config.logo_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => match fetch_image(http, url, config.logo_timeout_ms).await {
            Ok(image) => Some(Arc::new(image)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load logo, using text fallback");
                None
            }
        },
        None => None,
    };

    let biometry = if !order.customer.has_biometry {
        BiometryImage::Missing
    } else {
        match order.biometry_image_url() {
            None => BiometryImage::Missing,
            Some(url) => match fetch_image(http, url, config.logo_timeout_ms).await {
                Ok(image) => BiometryImage::Loaded(Arc::new(image)),
                Err(e) => {
                    tracing::warn!(order_id = %order.platform_order_id, error = %e, "Could not load biometry image");
                    BiometryImage::Failed
                }
            },
        }
    };

    ReportAssets { logo, biometry }
}

// ============================================================================
// Rendering
// ============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn render_error(e: impl std::fmt::Debug) -> ExportError {
    ExportError::Render(format!("{:?}", e))
}

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn point(x: f32, y: f32, page_height: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(page_height - y)), false)
}

fn draw(layer: &PdfLayerReference, element: &PdfElement, fonts: &Fonts, page_height: f32) {
    match element {
        PdfElement::Text { text, x, y, size, style, align, gray: level } => {
            let width = text_width(text, *size);
            let left = match align {
                Align::Left => *x,
                Align::Center => x - width / 2.0,
                Align::Right => x - width,
            };
            layer.set_fill_color(gray(*level));
            layer.use_text(text.clone(), *size, Mm(left), Mm(page_height - y), fonts.get(*style));
            layer.set_fill_color(gray(BLACK));
        }
        PdfElement::Line { x1, y1, x2, y2, width, gray: level } => {
            layer.set_outline_color(gray(*level));
            layer.set_outline_thickness(*width);
            layer.add_line(Line {
                points: vec![point(*x1, *y1, page_height), point(*x2, *y2, page_height)],
                is_closed: false,
            });
        }
        PdfElement::Rect { x, y, width, height, line_width, gray: level } => {
            layer.set_outline_color(gray(*level));
            layer.set_outline_thickness(*line_width);
            layer.add_line(Line {
                points: vec![
                    point(*x, *y, page_height),
                    point(x + width, *y, page_height),
                    point(x + width, y + height, page_height),
                    point(*x, y + height, page_height),
                ],
                is_closed: true,
            });
        }
        PdfElement::Image { image, x, y, width, height } => {
            let (px_width, _) = image.dimensions();
            // Drop any alpha channel; printpdf embeds plain RGB reliably
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            let dpi = px_width.max(1) as f32 * 25.4 / width.max(0.1);
            Image::from_dynamic_image(&rgb).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(*x)),
                    translate_y: Some(Mm(page_height - y - height)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }
    }
}

/// Draw a layout into PDF bytes
pub fn render(layout: &PdfDocumentLayout) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        &layout.title,
        Mm(layout.page_width),
        Mm(layout.page_height),
        "Conteúdo",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?,
        italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(render_error)?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(layout.page_width), Mm(layout.page_height), "Conteúdo");
            doc.get_page(page_index).get_layer(layer_index)
        };
        for element in &page.elements {
            draw(&layer, element, &fonts, layout.page_height);
        }
    }

    doc.save_to_bytes().map_err(render_error)
}

/// Build `pedido-<platformOrderId>-YYYY-MM-DD.pdf`
pub async fn export_order_pdf(
    http: &reqwest::Client,
    order: &Order,
    config: &ExportConfig,
    now: DateTime<Utc>,
) -> Result<ExportFile, ExportError> {
    let assets = load_assets(http, order, config).await;
    let layout = build_order_layout(order, &assets, &now, config.utc_offset_minutes);
    let bytes = render(&layout)?;

    Ok(ExportFile {
        file_name: format!("pedido-{}-{}.pdf", order.platform_order_id, file_date(&now)),
        content_type: CONTENT_TYPE,
        bytes,
    })
}
