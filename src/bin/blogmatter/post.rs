use std::fmt::{Display, Formatter, Write};
use std::fs::{create_dir, File};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use clap::{Parser, ValueEnum};

use blogmatter::text_utils::post_name_from_title;
use blogmatter::util::os_helper::get_name;

#[derive(Parser, Debug)]
pub struct PostArgs {
    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    name: Option<String>,

    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Comma separated tags
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Post generation options
    #[arg(short, long, default_value_t = PostOutput::Stdout)]
    output: PostOutput,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum PostOutput {
    /// Writes the new post content to the stdout
    Stdout,
    /// Writes the new post content to a file (posts without images)
    File,
    /// Writes the new post content to a directory (posts with images)
    Dir,
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PostOutput::Stdout => "stdout",
            PostOutput::File => "file",
            PostOutput::Dir => "dir",
        };
        write!(f, "{}", name)
    }
}

fn get_author(args: &PostArgs) -> String {
    if let Some(ref name) = args.name {
        return name.clone();
    }

    get_name()
}

/// Double-quoted YAML scalar. Line breaks and tabs become escapes so the value stays on
/// its line.
fn yaml_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn render_header(title: &str, author: &str, date: &DateTime<FixedOffset>, tags: &[String]) -> String {
    let mut buf = String::new();
    let tags: Vec<String> = tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(yaml_quote)
        .collect();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: {}", yaml_quote(title));
    let _ = writeln!(&mut buf, "date: {}", date.to_rfc3339());
    let _ = writeln!(&mut buf, "author: {}", yaml_quote(author));
    let _ = writeln!(&mut buf, "tags: [{}]", tags.join(", "));
    let _ = writeln!(&mut buf, "categories: []");
    let _ = writeln!(&mut buf, "draft: true");
    let _ = writeln!(&mut buf, "---");
    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "<!--more-->");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post");

    buf
}

fn post_path(output: &PostOutput, title: &str, date: &NaiveDate) -> Option<PathBuf> {
    let name = post_name_from_title(title, date);
    match output {
        PostOutput::Stdout => None,
        PostOutput::File => Some(PathBuf::from(format!("{}.md", name))),
        PostOutput::Dir => Some(PathBuf::from(name).join("index.md")),
    }
}

pub fn post_cmd(args: PostArgs) -> Result<()> {
    use std::io::Write;

    if args.title.trim().is_empty() {
        bail!("The title cannot be empty");
    }

    let author = get_author(&args);
    let date = Local::now().fixed_offset();
    let content = format!("{}{}", render_header(&args.title, &author, &date, &args.tags), render_body());

    let Some(full_path) = post_path(&args.output, &args.title, &date.date_naive()) else {
        print!("{}", content);
        return Ok(());
    };

    if let PostOutput::Dir = args.output {
        if let Some(dir) = full_path.parent() {
            create_dir(dir).with_context(|| format!("Error creating directory {}", dir.display()))?;
        }
    }

    println!("Creating post {}", full_path.display());
    let mut file = File::create(&full_path)
        .with_context(|| format!("Error creating {}", full_path.display()))?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
