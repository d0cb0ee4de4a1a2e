use compat_matrix::TargetEnv;

/// User agent presented by sessions emulating `env`. `DEFAULT` presents as
/// Chrome, the engine actually executing the page.
#[must_use]
pub fn user_agent(env: TargetEnv) -> &'static str {
    match env {
        TargetEnv::Default | TargetEnv::Chrome => {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        }
        TargetEnv::Edge => {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0"
        }
        TargetEnv::Firefox => {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0"
        }
        TargetEnv::FirefoxEsr => {
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:115.0) Gecko/20100101 Firefox/115.0"
        }
        TargetEnv::InternetExplorer => {
            "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko"
        }
    }
}
