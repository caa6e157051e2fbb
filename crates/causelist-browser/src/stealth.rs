//! Fingerprint masking for the automated browser.
//!
//! Court sites sit behind bot filters that look at `navigator.webdriver`,
//! navigator properties, the WebGL renderer, and the "hairline" probe
//! Modernizr runs. Each check gets a small init script installed with
//! `Page.addScriptToEvaluateOnNewDocument`, so it runs in every frame
//! before any page script.

use serde_json::Value;
use tracing::debug;

use crate::cdp::{CdpError, PageSession};

/// Reports `navigator.webdriver` as `false` through a native-looking getter.
pub const HIDE_WEBDRIVER: &str = r#"(()=>{const r=Function.prototype.toString,g=()=>false;Function.prototype.toString=function(){return this===g?'function get webdriver() { [native code] }':r.call(this)};Object.defineProperty(Navigator.prototype,'webdriver',{get:g,enumerable:false,configurable:true})})();"#;

/// Provides the `window.chrome` object regular Chrome pages see.
pub const CHROME_RUNTIME: &str = r#"(()=>{if(!window.chrome){Object.defineProperty(window,'chrome',{value:{},writable:true,configurable:true})}if(!window.chrome.runtime){window.chrome.runtime={}}})();"#;

/// Makes Modernizr's hairline probe report support for 0.5px borders.
pub const HAIRLINE_FIX: &str = r#"(()=>{const d=Object.getOwnPropertyDescriptor(HTMLElement.prototype,'offsetHeight');if(!d||!d.get)return;Object.defineProperty(HTMLDivElement.prototype,'offsetHeight',{...d,get:function(){if(this.id==='modernizr')return 1;return d.get.apply(this)}})})();"#;

/// Browser identity presented to the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StealthProfile {
    pub languages: Vec<String>,
    pub vendor: String,
    pub platform: String,
    pub webgl_vendor: String,
    pub renderer: String,
    pub fix_hairline: bool,
}

impl Default for StealthProfile {
    fn default() -> Self {
        Self {
            languages: vec!["en-US".to_string(), "en".to_string()],
            vendor: "Google Inc.".to_string(),
            platform: "Win32".to_string(),
            webgl_vendor: "Intel Inc.".to_string(),
            renderer: "Intel Iris OpenGL Engine".to_string(),
            fix_hairline: true,
        }
    }
}

impl StealthProfile {
    /// Init scripts for this profile, in installation order.
    pub fn scripts(&self) -> Vec<String> {
        let mut scripts = vec![
            HIDE_WEBDRIVER.to_string(),
            CHROME_RUNTIME.to_string(),
            navigator_getter("languages", &Value::from(self.languages.clone())),
            navigator_getter("language", &Value::from(self.primary_language())),
            navigator_getter("vendor", &Value::from(self.vendor.as_str())),
            navigator_getter("platform", &Value::from(self.platform.as_str())),
            webgl_script(&self.webgl_vendor, &self.renderer),
        ];

        if self.fix_hairline {
            scripts.push(HAIRLINE_FIX.to_string());
        }
        scripts
    }

    fn primary_language(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or("en-US")
    }

    /// `Accept-Language` value matching `languages`.
    pub fn accept_language(&self) -> String {
        self.languages.join(",")
    }

    /// Install the scripts on `page` and override its user agent.
    ///
    /// `user_agent` is the browser's own; the `HeadlessChrome` marker is
    /// replaced so headless runs do not announce themselves.
    pub async fn apply(&self, page: &PageSession, user_agent: &str) -> Result<(), CdpError> {
        for script in self.scripts() {
            page.add_script_on_new_document(&script).await?;
        }

        page.set_user_agent_override(
            &clean_user_agent(user_agent),
            &self.accept_language(),
            &self.platform,
        )
        .await?;

        debug!(
            "Applied stealth profile ({}, {})",
            self.platform, self.renderer
        );
        Ok(())
    }
}

/// Remove headless markers from a user agent string.
pub fn clean_user_agent(user_agent: &str) -> String {
    user_agent.replace("HeadlessChrome", "Chrome")
}

fn navigator_getter(property: &str, value: &Value) -> String {
    format!(
        "(()=>{{const v={value},g=()=>v;Object.defineProperty(g,'toString',{{value:()=>'function get {property}() {{ [native code] }}',configurable:true}});Object.defineProperty(Navigator.prototype,'{property}',{{get:g,enumerable:true,configurable:true}})}})();",
        value = value,
        property = property,
    )
}

fn webgl_script(vendor: &str, renderer: &str) -> String {
    format!(
        "(()=>{{const v={vendor},r={renderer},f=p=>p===37445?v:p===37446?r:null;for(const k of['WebGLRenderingContext','WebGL2RenderingContext']){{const o=globalThis[k]?.prototype?.getParameter;if(o){{Object.defineProperty(globalThis[k].prototype,'getParameter',{{value:function(p){{const s=f(p);return s??o.call(this,p)}},configurable:true}})}}}}}})();",
        vendor = Value::from(vendor),
        renderer = Value::from(renderer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = StealthProfile::default();
        assert_eq!(profile.languages, vec!["en-US", "en"]);
        assert_eq!(profile.vendor, "Google Inc.");
        assert_eq!(profile.platform, "Win32");
        assert_eq!(profile.webgl_vendor, "Intel Inc.");
        assert_eq!(profile.renderer, "Intel Iris OpenGL Engine");
        assert!(profile.fix_hairline);
    }

    #[test]
    fn test_scripts_cover_each_property() {
        let scripts = StealthProfile::default().scripts();
        let all = scripts.join("\n");

        assert!(scripts[0].contains("'webdriver'"));
        assert!(all.contains(r#"const v=["en-US","en"]"#));
        assert!(all.contains(r#"const v="Google Inc.""#));
        assert!(all.contains(r#"const v="Win32""#));
        assert!(all.contains(r#"const v="Intel Inc.",r="Intel Iris OpenGL Engine""#));
        assert!(all.contains("modernizr"));
    }

    #[test]
    fn test_hairline_fix_optional() {
        let profile = StealthProfile {
            fix_hairline: false,
            ..Default::default()
        };
        assert!(!profile.scripts().iter().any(|s| s.contains("modernizr")));
    }

    #[test]
    fn test_values_are_escaped() {
        let profile = StealthProfile {
            renderer: "ANGLE ('quoted')\"".to_string(),
            ..Default::default()
        };
        let webgl = profile
            .scripts()
            .into_iter()
            .find(|s| s.contains("37446"))
            .unwrap();
        assert!(webgl.contains(r#"r="ANGLE ('quoted')\"""#));
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(StealthProfile::default().accept_language(), "en-US,en");
    }

    #[test]
    fn test_clean_user_agent() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/126.0.0.0 Safari/537.36";
        let cleaned = clean_user_agent(ua);
        assert!(cleaned.contains(" Chrome/126.0.0.0 "));
        assert!(!cleaned.contains("Headless"));
    }
}
