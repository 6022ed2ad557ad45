//! Output formatting for the CLI.

use console::style;
use gomarket_cart::CartState;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the cart as a table, or as the raw snapshot in JSON mode.
    pub fn cart(&self, state: &CartState) {
        if self.json {
            self.json(state);
            return;
        }

        if state.is_empty() {
            self.info("Cart is empty.");
            return;
        }

        let rows = cart_rows(state);
        let widths = column_widths(&rows);
        let header = ["ID", "TITLE", "PRICE", "QTY"];
        self.table_row(&header, &widths);
        for row in &rows {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            self.table_row(&cols, &widths);
        }
        println!(
            "\n  {} line(s), {} item(s)",
            state.len(),
            style(state.total_quantity()).bold()
        );
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn cart_rows(state: &CartState) -> Vec<[String; 4]> {
    state
        .iter()
        .map(|item| {
            [
                item.id.to_string(),
                item.title.clone(),
                item.price.to_string(),
                item.quantity.to_string(),
            ]
        })
        .collect()
}

fn column_widths(rows: &[[String; 4]]) -> Vec<usize> {
    let mut widths = vec![2, 5, 5, 3];
    for row in rows {
        for (width, col) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(col.chars().count());
        }
    }
    widths
}
