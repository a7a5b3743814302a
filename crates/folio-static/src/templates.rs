//! Template engine for rendering blog pages.

use minijinja::{context, Environment};
use serde::Serialize;

use folio_mdx::format_date;
use folio_toc::SectionNode;

use crate::content::Post;

/// Tags shown on a post card before the rest collapse into a count.
const CARD_TAGS: usize = 3;

/// Site-wide values available to every template.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    /// Site title
    pub title: String,
    /// Author name shown in the header and meta tags
    pub author: String,
    /// Short introduction used on the home page and as the default description
    pub description: String,
    /// Base URL
    pub base_url: String,
}

/// A post as shown on cards and listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub url: String,
    pub title: String,
    /// ISO date for `<time datetime>`
    pub date: Option<String>,
    /// Long-form date, e.g. "January 5, 2025"
    pub date_display: Option<String>,
    pub description: Option<String>,
    /// Up to three tags for cards
    pub card_tags: Vec<String>,
    /// Tags beyond the first three
    pub extra_tags: usize,
    pub tags: Vec<String>,
}

impl PostSummary {
    pub fn from_post(post: &Post, base_url: &str) -> Self {
        let date = post.metadata.parsed_date();
        let tags = post.metadata.tags.clone();

        Self {
            slug: post.slug.clone(),
            url: format!("{}posts/{}/", base_url, post.slug),
            title: post.display_title().to_string(),
            date: date.map(|d| d.format("%Y-%m-%d").to_string()),
            date_display: date.map(format_date),
            description: post.metadata.description.clone(),
            card_tags: tags.iter().take(CARD_TAGS).cloned().collect(),
            extra_tags: tags.len().saturating_sub(CARD_TAGS),
            tags,
        }
    }
}

/// Context for a single post page.
#[derive(Debug, Clone, Serialize)]
pub struct PostContext {
    pub post: PostSummary,
    /// Rendered content HTML
    pub content: String,
    /// Table of contents sections
    pub sections: Vec<SectionNode>,
    /// Tracker settings for the browser runtime, as JSON
    pub toc_settings: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        for (name, source) in TEMPLATES {
            env.add_template_owned(name.to_string(), source.to_string())?;
        }

        Ok(Self { env })
    }

    pub fn render_home(
        &self,
        site: &SiteContext,
        posts: &[PostSummary],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("home.html")?.render(context! {
            site => site,
            title => &site.title,
            posts => posts,
        })
    }

    pub fn render_posts(
        &self,
        site: &SiteContext,
        posts: &[PostSummary],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("posts.html")?.render(context! {
            site => site,
            title => "Posts",
            posts => posts,
        })
    }

    pub fn render_post(
        &self,
        site: &SiteContext,
        page: &PostContext,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("post.html")?.render(context! {
            site => site,
            title => &page.post.title,
            description => &page.post.description,
            keywords => page.post.tags.join(", "),
            post => &page.post,
            content => &page.content,
            sections => &page.sections,
            toc_settings => &page.toc_settings,
        })
    }

    /// Render the about page. `content` is `None` when no about page was written.
    pub fn render_about(
        &self,
        site: &SiteContext,
        content: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("about.html")?.render(context! {
            site => site,
            title => "About",
            content => content,
        })
    }
}

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", BASE_TEMPLATE),
    ("home.html", HOME_TEMPLATE),
    ("posts.html", POSTS_TEMPLATE),
    ("post.html", POST_TEMPLATE),
    ("about.html", ABOUT_TEMPLATE),
    ("post_card.html", POST_CARD_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title != site.title %}{{ title }} | {% endif %}{{ site.title }}</title>
  <meta name="description" content="{{ description or site.description }}">
  <meta name="author" content="{{ site.author }}">
  {% if keywords %}<meta name="keywords" content="{{ keywords }}">
  {% endif %}<meta property="og:title" content="{{ title }}">
  <meta property="og:site_name" content="{{ site.title }}">
  <link rel="stylesheet" href="{{ site.base_url }}assets/main.css">
</head>
<body>
  <header class="navbar">
    <a href="{{ site.base_url }}" class="nav-logo">{{ site.title }}</a>
    <nav class="nav-links">
      <a href="{{ site.base_url }}posts/">Posts</a>
      <a href="{{ site.base_url }}about/">About</a>
    </nav>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  <script src="{{ site.base_url }}assets/main.js"></script>
</body>
</html>"##;

const POST_CARD_TEMPLATE: &str = r##"<a class="post-card" href="{{ post.url }}">
  <div class="post-meta">
    {% if post.date_display %}<time datetime="{{ post.date }}">{{ post.date_display }}</time>{% endif %}
    {% if post.card_tags %}<div class="tags">
      {% for tag in post.card_tags %}<span class="tag">{{ tag }}</span>{% endfor %}
      {% if post.extra_tags %}<span class="tag-more">+{{ post.extra_tags }} more</span>{% endif %}
    </div>{% endif %}
  </div>
  <h3>{{ post.title }}</h3>
  {% if post.description %}<p>{{ post.description }}</p>{% endif %}
</a>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="hero">
  <h1>{{ site.author }}</h1>
  <p>{{ site.description }}</p>
</section>
{% if posts %}
<section class="latest">
  <h2>Latest posts</h2>
  <div class="post-list">
  {% for post in posts %}{% include "post_card.html" %}{% endfor %}
  </div>
  <a class="all-posts" href="{{ site.base_url }}posts/">All posts &rarr;</a>
</section>
{% endif %}
{% endblock %}"##;

const POSTS_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="listing">
  <h1>Posts</h1>
  <p class="subtitle">Thoughts on development, tools, and technology.</p>
  {% if posts %}
  <div class="post-list">
  {% for post in posts %}{% include "post_card.html" %}{% endfor %}
  </div>
  {% else %}
  <p class="empty">No posts yet. Check back soon!</p>
  {% endif %}
</section>
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="post-layout">
  <article class="post">
    <a class="back" href="{{ site.base_url }}">&larr; Back to home</a>
    <header class="post-header">
      <h1>{{ post.title }}</h1>
      <div class="post-meta">
        {% if post.date_display %}<time datetime="{{ post.date }}">{{ post.date_display }}</time>{% endif %}
        {% for tag in post.tags %}<span class="tag">{{ tag }}</span>{% endfor %}
      </div>
      {% if post.description %}<p class="post-description">{{ post.description }}</p>{% endif %}
    </header>
    <div class="content">
      {{ content | safe }}
    </div>
    <footer class="post-footer">
      <a class="back" href="{{ site.base_url }}">&larr; Back to home</a>
    </footer>
  </article>
  {% if sections %}
  <aside class="toc" data-toc>
    <script type="application/json" id="toc-settings">{{ toc_settings | safe }}</script>
    <h2>Table of Contents</h2>
    <ul>
    {% for section in sections %}
      <li class="toc-section" data-section="{{ section.id }}">
        <div class="toc-row">
          {% if section.children %}<button type="button" class="toc-toggle" data-toggle="{{ section.id }}" aria-label="Toggle section">&#9656;</button>{% endif %}
          <a class="toc-link toc-level-{{ section.level }}" href="#{{ section.id }}" data-target="{{ section.id }}" title="{{ section.text }}">{{ section.text }}</a>
        </div>
        {% if section.children %}
        <ul class="toc-children" hidden>
          {% for child in section.children %}
          <li><a class="toc-link toc-level-{{ child.level }}" href="#{{ child.id }}" data-target="{{ child.id }}" title="{{ child.text }}">{{ child.text }}</a></li>
          {% endfor %}
        </ul>
        {% endif %}
      </li>
    {% endfor %}
    </ul>
  </aside>
  {% endif %}
</div>
{% endblock %}"##;

const ABOUT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post about">
  {% if content %}
  <div class="content">
    {{ content | safe }}
  </div>
  {% else %}
  <h1>Under Development</h1>
  <p>This page is currently being crafted with care. Check back soon.</p>
  <div class="badge">Coming Soon</div>
  {% endif %}
</article>
{% endblock %}"##;
