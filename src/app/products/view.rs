//! 产品表格渲染
//!
//! 所有产品字段都按文本输出，HTML 中一律转义。

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::model::Product;
use super::state::Page;

/// 表格列数：ID、名称、描述、价格、数量、操作
pub const COLUMN_COUNT: usize = 6;
pub const EMPTY_MESSAGE: &str = "No products found";

const HEADERS: [&str; COLUMN_COUNT] = ["ID", "Name", "Description", "Price", "Quantity", "Actions"];

/// 一行产品，单元格已经是最终显示文本
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: Option<i64>,
    pub id_text: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Product(ProductRow),
    /// 跨越全部列的空结果占位行
    Empty,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            id_text: product.id.map(|id| id.to_string()).unwrap_or_default(),
            name: product.name.clone(),
            description: product.display_description().to_string(),
            price: product.display_price(),
            quantity: product.quantity.to_string(),
        }
    }
}

impl TableRow {
    /// 每个单元格的显示文本，占位行只有一个单元格
    pub fn cells(&self) -> Vec<&str> {
        match self {
            TableRow::Product(row) => vec![
                row.id_text.as_str(),
                row.name.as_str(),
                row.description.as_str(),
                row.price.as_str(),
                row.quantity.as_str(),
                "Edit | Delete",
            ],
            TableRow::Empty => vec![EMPTY_MESSAGE],
        }
    }
}

/// 按响应顺序生成表格行；空列表生成一行占位
pub fn render_rows(products: &[Product]) -> Vec<TableRow> {
    if products.is_empty() {
        return vec![TableRow::Empty];
    }
    products
        .iter()
        .map(|p| TableRow::Product(ProductRow::from(p)))
        .collect()
}

/// 生成 `<tbody>` 的内部 HTML
///
/// 行上带 `data-id`，按钮上带 `data-action`，由表格容器上的单个监听器分发。
pub fn render_tbody_html(rows: &[TableRow]) -> String {
    let mut html = String::new();
    for row in rows {
        match row {
            TableRow::Empty => {
                html.push_str(&format!(
                    "<tr><td colspan=\"{}\" style=\"text-align: center;\">{}</td></tr>",
                    COLUMN_COUNT, EMPTY_MESSAGE
                ));
            }
            TableRow::Product(row) => {
                match row.id {
                    Some(id) => html.push_str(&format!(
                        "<tr data-id=\"{}\">",
                        encode_double_quoted_attribute(&id.to_string())
                    )),
                    None => html.push_str("<tr>"),
                }
                for cell in [&row.id_text, &row.name, &row.description, &row.price, &row.quantity] {
                    html.push_str("<td>");
                    html.push_str(&encode_text(cell));
                    html.push_str("</td>");
                }
                html.push_str(
                    "<td><button class=\"btn btn-edit\" data-action=\"edit\">Edit</button>\
                     <button class=\"btn btn-danger\" data-action=\"delete\">Delete</button></td>",
                );
                html.push_str("</tr>");
            }
        }
    }
    html
}

/// 终端用的对齐文本表格
pub fn render_text_table(rows: &[TableRow]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        if let TableRow::Product(_) = row {
            for (i, cell) in row.cells().iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }
    let total_width = widths.iter().sum::<usize>() + 3 * (COLUMN_COUNT - 1);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_padded(&HEADERS, &widths));
    lines.push("-".repeat(total_width));
    for row in rows {
        match row {
            TableRow::Empty => {
                let pad = total_width.saturating_sub(EMPTY_MESSAGE.len()) / 2;
                lines.push(format!("{}{}", " ".repeat(pad), EMPTY_MESSAGE));
            }
            TableRow::Product(_) => lines.push(join_padded(&row.cells(), &widths)),
        }
    }
    lines.join("\n")
}

fn join_padded(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// 整个页面的终端视图
pub fn render_page_text(page: &Page) -> String {
    let mut out = String::new();

    for message in page.success_messages() {
        out.push_str(&format!("[ok] {}\n", message));
    }
    if let Some(message) = page.error_message() {
        out.push_str(&format!("[error] {}\n", message));
    }

    let form = &page.form;
    out.push_str(&format!("== {} ==\n", form.title));
    if !form.id.is_empty() {
        out.push_str(&format!("  id:          {}\n", form.id));
    }
    out.push_str(&format!("  name:        {}\n", form.name));
    out.push_str(&format!("  description: {}\n", form.description));
    out.push_str(&format!("  price:       {}\n", form.price));
    out.push_str(&format!("  quantity:    {}\n", form.quantity));
    out.push_str(&format!("  [{}]", form.submit_label));
    if form.cancel_visible {
        out.push_str(" [Cancel]");
    }
    out.push_str("\n\n");

    if page.loading {
        out.push_str("Loading...\n");
    }
    out.push_str(&render_text_table(&page.table));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, description: Option<&str>, price: f64, quantity: i32) -> Product {
        Product {
            id: Some(id),
            name: name.to_string(),
            description: description.map(str::to_string),
            price,
            quantity,
        }
    }

    #[test]
    fn test_empty_list_renders_single_placeholder_row() {
        let rows = render_rows(&[]);
        assert_eq!(rows, vec![TableRow::Empty]);

        let html = render_tbody_html(&rows);
        assert_eq!(html.matches("<tr").count(), 1);
        assert!(html.contains("colspan=\"6\""));
        assert!(html.contains("No products found"));
    }

    #[test]
    fn test_rows_keep_order_and_format() {
        let products = vec![
            product(3, "Zeta", None, 9.5, 3),
            product(1, "Alpha", Some("first"), 10.0, 0),
            product(2, "Mid", Some(""), 0.125, 12),
        ];
        let rows = render_rows(&products);
        assert_eq!(rows.len(), 3);

        let names: Vec<_> = rows
            .iter()
            .map(|r| match r {
                TableRow::Product(p) => p.name.as_str(),
                TableRow::Empty => "",
            })
            .collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);

        match &rows[0] {
            TableRow::Product(row) => {
                assert_eq!(row.description, "N/A");
                assert_eq!(row.price, "$9.50");
                assert_eq!(row.quantity, "3");
            }
            TableRow::Empty => panic!("expected product row"),
        }
        match &rows[1] {
            TableRow::Product(row) => {
                assert_eq!(row.description, "first");
                assert_eq!(row.price, "$10.00");
            }
            TableRow::Empty => panic!("expected product row"),
        }
        match &rows[2] {
            TableRow::Product(row) => {
                assert_eq!(row.description, "N/A");
                assert_eq!(row.price, "$0.13");
            }
            TableRow::Empty => panic!("expected product row"),
        }
    }

    #[test]
    fn test_html_escapes_product_text() {
        let products = vec![product(
            1,
            "<script>alert(1)</script>",
            Some("a & b"),
            1.0,
            1,
        )];
        let html = render_tbody_html(&render_rows(&products));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_html_rows_carry_delegation_attributes() {
        let html = render_tbody_html(&render_rows(&[product(42, "Widget", None, 2.0, 1)]));
        assert!(html.starts_with("<tr data-id=\"42\">"));
        assert!(html.contains("data-action=\"edit\""));
        assert!(html.contains("data-action=\"delete\""));
        assert_eq!(html.matches("<td").count(), COLUMN_COUNT);
    }

    #[test]
    fn test_text_table_lists_every_row() {
        let rows = render_rows(&[product(1, "Widget", None, 2.0, 1), product(2, "Gadget", None, 3.0, 4)]);
        let text = render_text_table(&rows);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("Widget"));
        assert!(text.contains("$3.00"));

        let text = render_text_table(&render_rows(&[]));
        assert!(text.ends_with("No products found"));
    }
}
