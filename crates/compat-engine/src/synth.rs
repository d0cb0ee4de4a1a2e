//! Page synthesis: one self-contained HTML document per probe.
//!
//! Every page defines the same logging sink and completion flag, wraps the
//! probe in a try/catch that logs [`EXCEPTION_TOKEN`], and runs it from the
//! body `onload` handler. Engines read the sink back once the flag is set.

use compat_matrix::{ProbeCase, ProbeKind, EXCEPTION_TOKEN};

/// Page global holding logged values in emission order.
pub const LOG_SINK: &str = "__compatLog";

/// Page global set to `true` once the probe has finished, successfully or not.
pub const DONE_FLAG: &str = "__compatDone";

/// Expression that is `true` once the probe has completed.
pub const DONE_EXPRESSION: &str = "window.__compatDone === true";

/// Expression evaluating to the logged values.
pub const COLLECT_EXPRESSION: &str = "window.__compatLog";

/// A page ready to hand to an engine, tagged with the probe it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedPage {
    pub probe_id: String,
    pub html: String,
}

impl SynthesizedPage {
    /// The page as a `data:` URL, for engines that navigate rather than
    /// accept markup directly.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:text/html;charset=utf-8,{}", urlencoding::encode(&self.html))
    }
}

/// Builds probe pages. Stateless; pure string construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSynthesizer;

impl PageSynthesizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn synthesize(&self, case: &ProbeCase) -> SynthesizedPage {
        SynthesizedPage {
            probe_id: case.id(),
            html: self.html_for(&probe_body(case)),
        }
    }

    /// Wraps an arbitrary probe body in the standard page. The body runs
    /// inside the failure-catching region and may call `log(value)`.
    #[must_use]
    pub fn html_for(&self, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<title>compat probe</title>
<script>
  window.{LOG_SINK} = [];
  window.{DONE_FLAG} = false;
  function log(value) {{
    window.{LOG_SINK}.push(String(value));
  }}
  function test() {{
    try {{
{body}
    }} catch (e) {{
      log('{EXCEPTION_TOKEN}');
    }} finally {{
      window.{DONE_FLAG} = true;
    }}
  }}
</script>
</head>
<body onload="test()">
</body>
</html>
"#
        )
    }
}

/// Script statements for a probe. Names were validated when the case was
/// built; string arguments are still JSON-encoded before embedding.
fn probe_body(case: &ProbeCase) -> String {
    let name = js_string(case.name());
    match case.kind() {
        // Global names are validated identifier paths and must be evaluated
        // as code so that unknown names raise.
        ProbeKind::Global => format!("      log({});", case.name()),
        ProbeKind::Element => format!("      log(document.createElement({name}));"),
        ProbeKind::Style => {
            let property = js_string(case.property().unwrap_or_default());
            format!(
                "      var element = document.createElement({name});\n\
                 \x20     log(window.getComputedStyle(element, null).getPropertyValue({property}));\n\
                 \x20     document.body.appendChild(element);\n\
                 \x20     log(window.getComputedStyle(element, null).getPropertyValue({property}));"
            )
        }
    }
}

fn js_string(value: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_matrix::Expectations;

    fn page_for(case: &ProbeCase) -> SynthesizedPage {
        PageSynthesizer::new().synthesize(case)
    }

    #[test]
    fn page_defines_sink_guard_and_trigger() {
        let case =
            ProbeCase::element("div", Expectations::new(["[object HTMLDivElement]"])).unwrap();
        let page = page_for(&case);

        assert_eq!(page.probe_id, "element:div");
        assert!(page.html.contains("window.__compatLog = [];"));
        assert!(page.html.contains("window.__compatLog.push(String(value));"));
        assert!(page.html.contains("log('exception');"));
        assert!(page.html.contains("window.__compatDone = true;"));
        assert!(page.html.contains(r#"<body onload="test()">"#));
    }

    #[test]
    fn global_probes_evaluate_the_name() {
        let case = ProbeCase::global("Intl.Collator", Expectations::new(["x"])).unwrap();
        assert!(page_for(&case).html.contains("      log(Intl.Collator);"));
    }

    #[test]
    fn element_probes_create_by_tag_name() {
        let case = ProbeCase::element("a", Expectations::new([""])).unwrap();
        assert!(page_for(&case).html.contains(r#"log(document.createElement("a"));"#));
    }

    #[test]
    fn style_probes_log_before_and_after_attaching() {
        let case = ProbeCase::style("div", Expectations::new(["", "block"])).unwrap();
        let html = page_for(&case).html;

        let read = r#"log(window.getComputedStyle(element, null).getPropertyValue("display"));"#;
        let first = html.find(read).expect("detached read");
        let attach = html.find("document.body.appendChild(element);").expect("attach");
        let second = html.rfind(read).expect("attached read");
        assert!(first < attach && attach < second);
    }

    #[test]
    fn style_probes_use_custom_property() {
        let case = ProbeCase::style("div", Expectations::new(["", "visible"]))
            .unwrap()
            .with_property("visibility")
            .unwrap();
        assert!(page_for(&case).html.contains(r#"getPropertyValue("visibility")"#));
    }

    #[test]
    fn data_url_is_percent_encoded() {
        let case = ProbeCase::element("div", Expectations::new(["x"])).unwrap();
        let url = page_for(&case).data_url();
        assert!(url.starts_with("data:text/html;charset=utf-8,"));
        assert!(!url.contains(' '));
        assert!(!url.contains('<'));
    }
}
