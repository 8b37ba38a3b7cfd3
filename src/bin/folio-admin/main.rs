use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use folio::admin::{AdminService, PostInput, ProjectInput};
use folio::config::{find_config_path, read_config};
use folio::content::content_renderer::AdminRow;
use folio::content::{Collection, ContentRecord, Post, Project, RecordId};
use folio::logger::configure_logger;
use folio::store::open_store;

#[derive(Parser, Debug)]
#[command(version, about = "Manages the projects and blog posts of a folio site", long_about = None)]
struct Cli {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists every project, newest first
    ListProjects,
    /// Lists every post, drafts included, newest first
    ListPosts,
    /// Prints one record
    Show {
        /// projects or blog
        collection: Collection,
        id: String,
    },
    /// Adds a project
    AddProject(ProjectArgs),
    /// Adds a blog post
    AddPost(PostArgs),
    /// Changes a project. Fields not given keep their current value
    UpdateProject {
        id: String,
        #[command(flatten)]
        fields: ProjectArgs,
    },
    /// Changes a blog post. Fields not given keep their current value
    UpdatePost {
        id: String,
        #[command(flatten)]
        fields: PostArgs,
    },
    /// Deletes a record
    Delete {
        /// projects or blog
        collection: Collection,
        id: String,
    },
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// web, mobile, other...
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    github: Option<String>,
    #[arg(long)]
    live: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    /// Comma separated, e.g. "Rust, HTML"
    #[arg(long)]
    skills: Option<String>,
}

#[derive(Args, Debug)]
struct PostArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    excerpt: Option<String>,
    /// HTML body
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Reads the HTML body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// Comma separated
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    published: Option<bool>,
    /// Image URL
    #[arg(long)]
    cover_image: Option<String>,
    /// Defaults to the configured author, then the OS user real name
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    author_image: Option<String>,
}

impl ProjectArgs {
    fn into_input(self, current: Option<&Project>) -> ProjectInput {
        ProjectInput {
            title: self.title.or_else(|| current.map(|p| p.title.clone())).unwrap_or_default(),
            description: self.description.or_else(|| current.map(|p| p.description.clone())).unwrap_or_default(),
            category: self.category.or_else(|| current.map(|p| p.category.clone())).unwrap_or_default(),
            github: self.github.or_else(|| current.and_then(|p| p.github.clone())),
            live: self.live.or_else(|| current.and_then(|p| p.live.clone())),
            image: self.image,
            skills: self.skills.or_else(|| current.map(|p| p.skills.join(", "))).unwrap_or_default(),
        }
    }
}

impl PostArgs {
    fn into_input(self, current: Option<&Post>) -> Result<PostInput> {
        let content = match self.content_file {
            Some(ref path) => Some(fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?),
            None => self.content,
        };

        Ok(PostInput {
            title: self.title.or_else(|| current.map(|p| p.title.clone())).unwrap_or_default(),
            excerpt: self.excerpt.or_else(|| current.map(|p| p.excerpt.clone())).unwrap_or_default(),
            content: content.or_else(|| current.map(|p| p.content.clone())).unwrap_or_default(),
            tags: self.tags.or_else(|| current.map(|p| p.tags.join(", "))).unwrap_or_default(),
            published: self.published.or_else(|| current.map(|p| p.published)).unwrap_or(false),
            cover_image: self.cover_image,
            author: self.author,
            author_image: self.author_image,
        })
    }
}

fn print_rows(rows: &[AdminRow]) {
    if rows.is_empty() {
        println!("Nothing here yet.");
        return;
    }
    for row in rows {
        println!("{}  {}  [{}]", row.id, row.title, row.badge);
        if !row.text.is_empty() {
            println!("    {}", row.text);
        }
    }
}

fn print_record(record: &ContentRecord) {
    println!("{}", record);
    match record {
        ContentRecord::Project(project) => {
            println!("category: {}", project.category);
            println!("skills:   {}", project.skills.join(", "));
            println!("image:    {}", project.image);
            if let Some(ref github) = project.github {
                println!("github:   {}", github);
            }
            if let Some(ref live) = project.live {
                println!("live:     {}", live);
            }
            println!();
            println!("{}", project.description);
        }
        ContentRecord::Post(post) => {
            println!("author:    {}", post.author);
            println!("published: {}", post.published);
            println!("tags:      {}", post.tags.join(", "));
            println!();
            println!("{}", post.excerpt);
            println!();
            println!("{}", post.content);
        }
    }
}

#[ntex::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config_path.map(PathBuf::from).or_else(find_config_path) {
        Some(path) => path,
        None => bail!("Could not find folio configuration. Please run folio --init"),
    };
    let config = read_config(&config_path)?;
    configure_logger(config.log.as_ref())?;

    let store = open_store(&config.store).context("Could not open the content store")?;
    let admin = AdminService::new(store, &config.default_author());

    match cli.command {
        Command::ListProjects => print_rows(&admin.list_projects().await?),
        Command::ListPosts => print_rows(&admin.list_posts().await?),
        Command::Show { collection, id } => {
            print_record(&admin.find(collection, &RecordId(id)).await?);
        }
        Command::AddProject(fields) => {
            let id = admin.create_project(&fields.into_input(None)).await?;
            println!("Created project {}", id);
        }
        Command::AddPost(fields) => {
            let id = admin.create_post(&fields.into_input(None)?).await?;
            println!("Created post {}", id);
        }
        Command::UpdateProject { id, fields } => {
            let id = RecordId(id);
            let ContentRecord::Project(current) = admin.find(Collection::Projects, &id).await? else {
                bail!("{} is not a project", id);
            };
            admin.update_project(&id, &fields.into_input(Some(&current))).await?;
            println!("Updated project {}", id);
        }
        Command::UpdatePost { id, fields } => {
            let id = RecordId(id);
            let ContentRecord::Post(current) = admin.find(Collection::Blog, &id).await? else {
                bail!("{} is not a post", id);
            };
            admin.update_post(&id, &fields.into_input(Some(&current))?).await?;
            println!("Updated post {}", id);
        }
        Command::Delete { collection, id } => {
            admin.delete(collection, &RecordId(id.clone())).await?;
            println!("Deleted {} {}", collection, id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_argument() {
        let cli = Cli::try_parse_from(["folio-admin", "delete", "blog", "a"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { collection: Collection::Blog, .. }));

        let cli = Cli::try_parse_from(["folio-admin", "show", "projects", "p1"]).unwrap();
        assert!(matches!(cli.command, Command::Show { collection: Collection::Projects, .. }));

        assert!(Cli::try_parse_from(["folio-admin", "show", "posts", "a"]).is_err());
    }
}
