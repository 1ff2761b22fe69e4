#[cfg(test)]
use std::path::Path;

#[cfg(test)]
use crate::content::{parse_content, ContentRecord};

#[cfg(test)]
pub const POST_DATA: &str = r#"---
title: "Podman for dev environments"
date: 2023-05-28T10:30:00+02:00
lastmod: 2023-06-01T08:00:00+02:00
description: Running a web API and a database with Podman
slug: podman-for-dev-environments
tags: [podman, containers, podman]
categories:
  - devops
draft: false
comments: true
---

Running an API and its database in a single pod.

<!--more-->

## Creating the pod

```bash
podman pod create --name blog -p 8080:8080
```

---

That's it.
"#;

#[cfg(test)]
pub const TOML_POST_DATA: &str = r#"+++
title = "Podman for dev environments"
date = 2023-05-28T10:30:00+02:00
lastmod = "2023-06-01T08:00:00+02:00"
description = "Running a web API and a database with Podman"
slug = "podman-for-dev-environments"
tags = ["podman", "containers", "podman"]
categories = ["devops"]
draft = false
comments = true
+++

Running an API and its database in a single pod.

<!--more-->

## Creating the pod

```bash
podman pod create --name blog -p 8080:8080
```

---

That's it.
"#;

#[cfg(test)]
pub const DRAFT_DATA: &str = r#"---
title: "Starting Anew"
date: 2023-05-22T01:00:00+02:00
draft: true
---
"#;

/// Builds a minimal valid post at `path`.
#[cfg(test)]
pub fn record(path: &str, date: &str, draft: bool) -> ContentRecord {
    record_with_tags(path, date, draft, &[])
}

#[cfg(test)]
pub fn record_with_tags(path: &str, date: &str, draft: bool, tags: &[&str]) -> ContentRecord {
    let text = post_text(path, date, draft, tags);
    parse_content(Path::new(path), &text).unwrap()
}

#[cfg(test)]
pub fn post_text(title: &str, date: &str, draft: bool, tags: &[&str]) -> String {
    format!("---\ntitle: \"{}\"\ndate: {}\ndraft: {}\ntags: [{}]\n---\nBody of {}\n",
            title, date, draft, tags.join(", "), title)
}
