//! Per-format version substitutions

use regex::Regex;
use std::sync::LazyLock;

/// A known file that pins the Node.js version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `package.json` `engines.node`
    PackageJson,
    /// Travis CI `node_js`
    TravisYml,
    /// CircleCI 1.0 `machine.node.version`
    CircleYml,
    /// CircleCI 2.0 `circleci/node:<version>` image
    CircleCiConfig,
}

impl ManifestKind {
    /// Every kind, in patch order
    pub const ALL: [Self; 4] = [
        Self::PackageJson,
        Self::TravisYml,
        Self::CircleYml,
        Self::CircleCiConfig,
    ];

    /// Repository-relative path of the file
    pub const fn path(self) -> &'static str {
        match self {
            Self::PackageJson => "package.json",
            Self::TravisYml => ".travis.yml",
            Self::CircleYml => "circle.yml",
            Self::CircleCiConfig => ".circleci/config.yml",
        }
    }

    /// Substitutions for this format, applied in order
    pub(super) fn rules(self) -> &'static [Rule] {
        match self {
            Self::PackageJson => &PACKAGE_JSON,
            Self::TravisYml => &TRAVIS,
            Self::CircleYml => &CIRCLE,
            Self::CircleCiConfig => &CIRCLE_CI,
        }
    }
}

/// One anchored pattern and the template that replaces it
pub(super) struct Rule {
    pattern: LazyLock<Regex>,
    template: &'static str,
}

impl Rule {
    /// Replace every match, with `{version}` in the template set to `version`
    pub(super) fn apply(&self, content: &str, version: &str) -> String {
        let replacement = self.template.replace("{version}", version);
        self.pattern
            .replace_all(content, regex::NoExpand(&replacement))
            .into_owned()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

static PACKAGE_JSON: [Rule; 1] = [Rule {
    pattern: LazyLock::new(|| compile(r#""node": "\d+\.\d+\.\d+""#)),
    template: r#""node": "{version}""#,
}];

static TRAVIS: [Rule; 2] = [
    Rule {
        pattern: LazyLock::new(|| compile(r#"node_js:\n {2}- "\d+\.\d+\.\d+""#)),
        template: "node_js:\n  - \"{version}\"",
    },
    Rule {
        pattern: LazyLock::new(|| compile(r"node_js: \d+\.\d+\.\d+")),
        template: "node_js: {version}",
    },
];

static CIRCLE: [Rule; 1] = [Rule {
    pattern: LazyLock::new(|| compile(r"node:\n {4}version: \d+\.\d+\.\d+")),
    template: "node:\n    version: {version}",
}];

static CIRCLE_CI: [Rule; 1] = [Rule {
    pattern: LazyLock::new(|| compile(r"node:\d+\.\d+\.\d+")),
    template: "node:{version}",
}];
