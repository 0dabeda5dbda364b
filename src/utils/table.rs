/// A simple HTML table generator for server-rendered pages
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
    selectable: bool,
}

struct Row {
    index: Option<usize>,
    cells: Vec<String>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            selectable: false,
        }
    }

    /// Prepend a checkbox column whose value is the row's ledger index
    pub fn with_selection(mut self) -> Self {
        self.selectable = true;
        self
    }

    /// Add a row to the table; `index` feeds the selection checkbox
    pub fn add_row(&mut self, index: Option<usize>, row: Vec<String>) {
        self.rows.push(Row { index, cells: row });
    }

    /// Render the table as HTML. Cell text is escaped.
    pub fn render(&self) -> String {
        let mut output = String::from("<table class=\"min-w-full text-sm\">\n<thead>\n<tr>");

        if self.selectable {
            output.push_str("<th class=\"px-3 py-2\"><input type=\"checkbox\" id=\"selectAll\"></th>");
        }
        for header in &self.headers {
            output.push_str(&format!(
                "<th class=\"px-3 py-2 text-left font-semibold text-gray-600\">{}</th>",
                escape_html(header)
            ));
        }
        output.push_str("</tr>\n</thead>\n<tbody>\n");

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output.push_str("</tbody>\n</table>");
        output
    }

    /// Render a single row, padding short rows to the header width
    fn render_row(&self, row: &Row) -> String {
        let mut line = String::from("<tr class=\"border-t border-gray-100\">");

        if self.selectable {
            match row.index {
                Some(index) => line.push_str(&format!(
                    "<td class=\"px-3 py-2\"><input type=\"checkbox\" class=\"row-select\" value=\"{}\"></td>",
                    index
                )),
                None => line.push_str("<td class=\"px-3 py-2\"></td>"),
            }
        }

        for i in 0..self.headers.len() {
            let cell = row.cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!("<td class=\"px-3 py-2\">{}</td>", escape_html(cell)));
        }

        line.push_str("</tr>");
        line
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(vec!["Tanggal", "Jenis", "Total"]);
        table.add_row(None, vec!["2025-05-10".into(), "Food".into(), "Rp 25.000".into()]);
        table.add_row(None, vec!["2025-05-11".into(), "Bike".into()]);

        let rendered = table.render();
        assert!(rendered.contains("<th class=\"px-3 py-2 text-left font-semibold text-gray-600\">Jenis</th>"));
        assert!(rendered.contains("Rp 25.000"));
        assert_eq!(rendered.matches("<td").count(), 6);
        assert!(!rendered.contains("selectAll"));
    }

    #[test]
    fn selection_column_carries_row_index() {
        let mut table = Table::new(vec!["Jenis"]).with_selection();
        table.add_row(Some(7), vec!["Regular".into()]);

        let rendered = table.render();
        assert!(rendered.contains("id=\"selectAll\""));
        assert!(rendered.contains("class=\"row-select\" value=\"7\""));
    }

    #[test]
    fn cells_are_escaped() {
        let mut table = Table::new(vec!["Jenis"]);
        table.add_row(None, vec!["<script>alert('x')</script>".into()]);

        let rendered = table.render();
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
