//! Default files for newly created projects.

use super::{FileKind, ProjectFile, ProjectKind};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Web Sketch</title>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <!-- CSS files will be injected here -->
</head>
<body>
  <h1>Hello Web Sketch Studio!</h1>
  <p>Start editing to see some magic happen.</p>
  <p><a href="about.html">About Us</a></p>

  <!-- JS files will be injected here -->
</body>
</html>"#;

const ABOUT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>About Us - Web Sketch</title>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <!-- CSS files will be injected here -->
</head>
<body>
  <h1>About Us</h1>
  <p>This is the about page of Web Sketch Studio.</p>
  <p><a href="index.html">Back to Home</a></p>

  <!-- JS files will be injected here -->
</body>
</html>"#;

const STYLES_CSS: &str = "body {
  font-family: sans-serif;
  margin: 0;
  padding: 20px;
  background-color: #f7f7f7;
}

h1 {
  color: #333;
}

p {
  color: #666;
}

a {
  color: #0066cc;
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}";

const SCRIPT_JS: &str = r#"console.log("Hello from Web Sketch Studio!");

// Your JavaScript code goes here"#;

/// Build the seeded file set for a new project.
///
/// Every call generates fresh ids, so two projects never share file identities.
pub fn default_files(kind: ProjectKind) -> Vec<ProjectFile> {
    match kind {
        ProjectKind::Single => vec![ProjectFile::new("index.html", FileKind::Markup, INDEX_HTML)],
        ProjectKind::Multi => vec![
            ProjectFile::new("index.html", FileKind::Markup, INDEX_HTML),
            ProjectFile::new("about.html", FileKind::Markup, ABOUT_HTML),
            ProjectFile::new("styles.css", FileKind::Style, STYLES_CSS),
            ProjectFile::new("script.js", FileKind::Script, SCRIPT_JS),
        ],
    }
}
