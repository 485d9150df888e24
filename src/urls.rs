/// Builds API URLs from resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    base: String,
}

impl Urls {
    /// Create a builder rooted at `base` (e.g. `https://app.launchdarkly.com/api/v2`).
    pub fn new(base: impl Into<String>) -> Urls {
        let base = base.into();
        Urls {
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    /// Collection used to create projects.
    pub fn project_create(&self) -> String {
        format!("{}/projects", self.base)
    }

    /// A single project.
    pub fn project(&self, project: &str) -> String {
        format!("{}/projects/{}", self.base, project)
    }

    /// Collection used to create flags in `project`.
    pub fn flag_create(&self, project: &str) -> String {
        format!("{}/flags/{}", self.base, project)
    }

    /// A single flag.
    pub fn flag(&self, project: &str, flag: &str) -> String {
        format!("{}/flags/{}/{}", self.base, project, flag)
    }

    /// Collection used to create environments in `project`.
    pub fn environment_create(&self, project: &str) -> String {
        format!("{}/projects/{}/environments", self.base, project)
    }

    /// A single environment.
    pub fn environment(&self, project: &str, environment: &str) -> String {
        format!("{}/projects/{}/environments/{}", self.base, project, environment)
    }
}

impl Default for Urls {
    fn default() -> Self {
        Urls::new(crate::ProviderConfig::DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::Urls;

    const BASE: &str = "https://app.launchdarkly.com/api/v2/";
    const PROJECT: &str = "my-project";

    #[test]
    fn project_urls() {
        let urls = Urls::default();
        assert_eq!(urls.project_create(), format!("{BASE}projects"));
        assert_eq!(urls.project(PROJECT), format!("{BASE}projects/{PROJECT}"));
    }

    #[test]
    fn flag_urls() {
        let urls = Urls::default();
        assert_eq!(urls.flag_create(PROJECT), format!("{BASE}flags/{PROJECT}"));
        assert_eq!(
            urls.flag(PROJECT, "my-super-flag"),
            format!("{BASE}flags/{PROJECT}/my-super-flag")
        );
    }

    #[test]
    fn environment_urls() {
        let urls = Urls::default();
        assert_eq!(
            urls.environment_create(PROJECT),
            format!("{BASE}projects/{PROJECT}/environments")
        );
        assert_eq!(
            urls.environment(PROJECT, "my-marvelous-environment"),
            format!("{BASE}projects/{PROJECT}/environments/my-marvelous-environment")
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        assert_eq!(
            Urls::new("http://localhost:8080/").project("p"),
            "http://localhost:8080/projects/p"
        );
    }
}
