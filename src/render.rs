//! RouterOS script generation.
//!
//! The generated script clears the target address list and re-adds every
//! entry as a dynamic element that expires after `timeout_days`:
//!
//! ```text
//! # Generated on 2024-05-01 12:30:45
//! /ip firewall address-list remove [find list=spamhaus-drop-v4]
//! :local ips { \
//! { "203.0.113.0/24" };\
//! { "203.0.113.128/25" }\
//! };
//! :foreach ip in=$ips do={
//!     /ip firewall address-list add list=spamhaus-drop-v4 address=$ip dynamic=yes timeout=1d
//! }
//! :set ips
//! ```
//!
//! The loop body is indented with a single tab.

use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Days a dynamic entry stays on the router
pub const DEFAULT_TIMEOUT_DAYS: u32 = 1;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turns an address list into script text.
///
/// Callers never pass an empty `entries` slice.
#[cfg_attr(test, automock)]
pub trait ScriptRenderer: Send + Sync {
    fn render(&self, entries: &[String], list_name: &str, command_path: &str) -> String;
}

/// RouterOS address-list script renderer
#[derive(Debug, Clone, Copy)]
pub struct RouterOsRenderer {
    timeout_days: u32,
}

impl RouterOsRenderer {
    pub fn new(timeout_days: u32) -> Self {
        Self { timeout_days }
    }

    /// Render with an explicit generation time
    pub fn render_at(
        &self,
        entries: &[String],
        list_name: &str,
        command_path: &str,
        generated_at: DateTime<Utc>,
    ) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            "# Generated on {}\n",
            generated_at.format(TIMESTAMP_FORMAT)
        ));
        script.push_str(&format!(
            "{} firewall address-list remove [find list={}]\n",
            command_path, list_name
        ));
        script.push_str(":local ips { \\\n");

        let last = entries.len().saturating_sub(1);
        for (index, entry) in entries.iter().enumerate() {
            script.push_str(&format!("{{ \"{}\" }}", entry));
            if index < last {
                script.push(';');
            }
            script.push_str("\\\n");
        }

        script.push_str("};\n");
        script.push_str(":foreach ip in=$ips do={\n");
        script.push_str(&format!(
            "\t{} firewall address-list add list={} address=$ip dynamic=yes timeout={}d\n",
            command_path, list_name, self.timeout_days
        ));
        script.push_str("}\n");
        script.push_str(":set ips\n");

        script
    }
}

impl Default for RouterOsRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_DAYS)
    }
}

impl ScriptRenderer for RouterOsRenderer {
    fn render(&self, entries: &[String], list_name: &str, command_path: &str) -> String {
        self.render_at(entries, list_name, command_path, Utc::now())
    }
}
