//! Injection of a server-rendered fragment into the result container.
//!
//! Scripts inserted through `innerHTML` are inert, so after the fragment is
//! set every `<script>` is swapped for a freshly created copy, which the
//! browser does execute.

/// Attributes carried over from an inert script to its replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAttrs {
    pub src: Option<String>,
    pub script_type: Option<String>,
    pub id: Option<String>,
    pub is_async: bool,
    pub text: String,
}

impl ScriptAttrs {
    /// Empty attribute values are not copied.
    pub fn normalized(self) -> Self {
        fn non_empty(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }
        Self {
            src: non_empty(self.src),
            script_type: non_empty(self.script_type),
            id: non_empty(self.id),
            ..self
        }
    }
}

/// A container that can hold markup and re-mount its scripts.
pub trait MarkupHost {
    type Script;
    type Error;

    /// Replaces the container's contents with `fragment`.
    fn set_markup(&mut self, fragment: &str) -> Result<(), Self::Error>;

    /// Script elements currently in the container, in document order.
    fn scripts(&self) -> Vec<Self::Script>;

    fn script_attrs(&self, script: &Self::Script) -> ScriptAttrs;

    /// Swaps `script` for a new script element built from `attrs`.
    fn replace_script(&mut self, script: &Self::Script, attrs: &ScriptAttrs)
        -> Result<(), Self::Error>;
}

/// Sets `fragment` on `host` and re-activates its scripts. Returns how many
/// scripts were re-created.
pub fn inject_and_activate<H: MarkupHost>(host: &mut H, fragment: &str) -> Result<usize, H::Error> {
    host.set_markup(fragment)?;

    let scripts = host.scripts();
    for script in &scripts {
        let attrs = host.script_attrs(script).normalized();
        host.replace_script(script, &attrs)?;
    }
    tracing::debug!(scripts = scripts.len(), "fragment injected");
    Ok(scripts.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what a DOM would do, with scripts found by a naive scan.
    #[derive(Default)]
    struct FakeHost {
        markup: String,
        scripts: Vec<ScriptAttrs>,
        live: Vec<bool>,
        fail_on_set: bool,
    }

    fn attr(tag: &str, name: &str) -> Option<String> {
        let needle = format!("{name}=\"");
        let start = tag.find(&needle)? + needle.len();
        let end = tag[start..].find('"')? + start;
        Some(tag[start..end].to_string())
    }

    impl MarkupHost for FakeHost {
        type Script = usize;
        type Error = String;

        fn set_markup(&mut self, fragment: &str) -> Result<(), String> {
            if self.fail_on_set {
                return Err("set_inner_html threw".into());
            }
            self.markup = fragment.to_string();
            self.scripts.clear();
            self.live.clear();

            let mut rest = fragment;
            while let Some(open) = rest.find("<script") {
                let after = &rest[open..];
                let tag_end = after.find('>').ok_or("unterminated tag")?;
                let tag = &after[..tag_end];
                let close = after.find("</script>").ok_or("unterminated script")?;
                self.scripts.push(ScriptAttrs {
                    src: attr(tag, "src"),
                    script_type: attr(tag, "type"),
                    id: attr(tag, "id"),
                    is_async: tag.contains(" async"),
                    text: after[tag_end + 1..close].to_string(),
                });
                self.live.push(false);
                rest = &after[close + "</script>".len()..];
            }
            Ok(())
        }

        fn scripts(&self) -> Vec<usize> {
            (0..self.scripts.len()).collect()
        }

        fn script_attrs(&self, script: &usize) -> ScriptAttrs {
            self.scripts[*script].clone()
        }

        fn replace_script(&mut self, script: &usize, attrs: &ScriptAttrs) -> Result<(), String> {
            self.scripts[*script] = attrs.clone();
            self.live[*script] = true;
            Ok(())
        }
    }

    #[test]
    fn every_script_is_recreated_with_its_attributes() {
        let mut host = FakeHost::default();
        let fragment = r#"<div id="anim"></div>
<script type="text/javascript" id="boot">var a = 1;</script>
<script src="/static/plotly.js" async></script>"#;

        let n = inject_and_activate(&mut host, fragment).unwrap();
        assert_eq!(n, 2);
        assert!(host.live.iter().all(|l| *l));
        assert_eq!(host.scripts[0].id.as_deref(), Some("boot"));
        assert_eq!(host.scripts[0].script_type.as_deref(), Some("text/javascript"));
        assert_eq!(host.scripts[0].text, "var a = 1;");
        assert_eq!(host.scripts[1].src.as_deref(), Some("/static/plotly.js"));
        assert!(host.scripts[1].is_async);
        assert_eq!(host.scripts[1].id, None);
    }

    #[test]
    fn fragment_without_scripts_is_just_set() {
        let mut host = FakeHost::default();
        assert_eq!(inject_and_activate(&mut host, "<div>...</div>"), Ok(0));
        assert_eq!(host.markup, "<div>...</div>");
    }

    #[test]
    fn second_injection_replaces_first() {
        let mut host = FakeHost::default();
        inject_and_activate(&mut host, "<script>one()</script>").unwrap();
        inject_and_activate(&mut host, "<p>two</p>").unwrap();
        assert!(host.scripts.is_empty());
        assert_eq!(host.markup, "<p>two</p>");
    }

    #[test]
    fn host_errors_propagate() {
        let mut host = FakeHost {
            fail_on_set: true,
            ..FakeHost::default()
        };
        assert!(inject_and_activate(&mut host, "<p/>").is_err());
    }

    #[test]
    fn empty_attributes_are_dropped() {
        let attrs = ScriptAttrs {
            src: Some(String::new()),
            script_type: Some("module".into()),
            id: Some(String::new()),
            is_async: false,
            text: "x".into(),
        }
        .normalized();
        assert_eq!(attrs.src, None);
        assert_eq!(attrs.id, None);
        assert_eq!(attrs.script_type.as_deref(), Some("module"));
    }
}
