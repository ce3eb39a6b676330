//! Server-rendered HTML: the dashboard page, the reset confirmation, and
//! error fragments. Styles are inlined so the page can be embedded in an
//! iframe without further assets.

use chrono::{DateTime, Utc};

use crate::config::{ConfigError, STORE_ACCESS_KEY_VAR, STORE_URL_VAR};
use crate::services::dashboard::{describe, DashboardData};

const DASHBOARD_CSS: &str = "body{font-family:system-ui,sans-serif;padding:15px;margin:0;background:#fff;height:100vh;box-sizing:border-box;overflow:hidden}\
.total-section{text-align:center;padding-bottom:15px;border-bottom:2px solid #e9ecef;margin-bottom:15px}\
.total-label{font-size:11px;color:#666;text-transform:uppercase;letter-spacing:.5px;margin-bottom:5px}\
.total-count{font-size:48px;font-weight:bold;color:#2c3e50;margin:0;line-height:1}\
.total-time{font-size:12px;color:#6c757d;margin-top:5px}\
.campaigns-section{max-height:180px;overflow-y:auto}\
.campaigns-label{font-size:10px;color:#666;text-transform:uppercase;letter-spacing:.5px;margin-bottom:8px;text-align:center}\
.campaign-row{display:flex;justify-content:space-between;align-items:center;padding:6px 8px;margin-bottom:4px;background:#f8f9fa;border-radius:4px;border-left:3px solid #007bff}\
.campaign-name{font-size:12px;color:#495057;font-weight:500;flex:1;text-align:left;overflow:hidden;text-overflow:ellipsis;white-space:nowrap;margin-right:8px}\
.campaign-stats{display:flex;flex-direction:column;align-items:flex-end;min-width:60px}\
.campaign-count{font-size:16px;font-weight:bold;color:#2c3e50;line-height:1}\
.campaign-time{font-size:9px;color:#6c757d;margin-top:1px}\
.no-campaigns{text-align:center;color:#6c757d;font-size:12px;font-style:italic;padding:20px}\
.campaigns-section::-webkit-scrollbar{width:4px}\
.campaigns-section::-webkit-scrollbar-track{background:#f1f1f1;border-radius:2px}\
.campaigns-section::-webkit-scrollbar-thumb{background:#ccc;border-radius:2px}\
.campaigns-section::-webkit-scrollbar-thumb:hover{background:#999}";

/// Label for a global total that has never been incremented.
pub const NO_CALLS_YET: &str = "No calls yet";

/// Label for a campaign row without a timestamp.
pub const NEVER: &str = "Never";

/// Message posted to the embedding page once a reset has been applied.
pub const RESET_COMPLETE_MESSAGE: &str = "reset-complete";

/// Full dashboard document.
pub fn dashboard(data: &DashboardData, now: DateTime<Utc>) -> String {
    let total_time = describe(data.total.last_increment, now, NO_CALLS_YET);

    let rows = if data.campaigns.is_empty() {
        format!("<div class=\"no-campaigns\">{NO_CALLS_YET}</div>")
    } else {
        data.campaigns
            .iter()
            .map(|campaign| {
                format!(
                    "<div class=\"campaign-row\"><div class=\"campaign-name\">{name}</div>\
                     <div class=\"campaign-stats\"><span class=\"campaign-count\">{count}</span>\
                     <span class=\"campaign-time\">{time}</span></div></div>",
                    name = html_escape(&campaign.name),
                    count = campaign.count,
                    time = describe(campaign.last_increment, now, NEVER),
                )
            })
            .collect()
    };

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>{DASHBOARD_CSS}</style></head><body>\
         <div class=\"total-section\"><div class=\"total-label\">Total Transfers</div>\
         <div class=\"total-count\">{total}</div><div class=\"total-time\">Last: {total_time}</div></div>\
         <div class=\"campaigns-section\"><div class=\"campaigns-label\">Transfers per Campaign</div>{rows}</div>\
         </body></html>",
        total = data.total.total_count,
    )
}

/// Confirmation shown after a reset; notifies an embedding parent page.
pub fn reset_complete() -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head>\
         <body style=\"font-family: system-ui; text-align: center; padding: 20px;\">\
         <div style=\"color: #28a745; font-size: 18px;\">&#10003; Reset Complete</div>\
         <script>setTimeout(() => {{ if (window.parent !== window) {{ \
         window.parent.postMessage('{RESET_COMPLETE_MESSAGE}', '*'); }} }}, 1000);</script>\
         </body></html>"
    )
}

/// Small error fragment with a single message.
pub fn error_fragment(message: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head>\
         <body style=\"font-family: system-ui; text-align: center; padding: 20px;\">\
         <div style=\"color: #dc3545;\">{}</div></body></html>",
        html_escape(message)
    )
}

/// Page explaining which store variables must be set.
pub fn configuration_error(err: &ConfigError) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Configuration Error</title>\
         <style>body{{font-family:Arial,sans-serif;padding:40px;max-width:800px;margin:0 auto}}\
         .error{{background:#fee;border:1px solid #fcc;padding:20px;border-radius:5px}}\
         h1{{color:#d00}}pre{{background:#f5f5f5;padding:10px;border-radius:3px;overflow-x:auto}}</style>\
         </head><body><div class=\"error\"><h1>Configuration Error</h1><p>{detail}</p>\
         <p>Please set the following environment variables:</p>\
         <pre>{STORE_URL_VAR}=postgres://user@host:5432/database\n{STORE_ACCESS_KEY_VAR}=your-store-access-key</pre>\
         <p>Then restart the service.</p></div></body></html>",
        detail = html_escape(&err.guidance()),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
