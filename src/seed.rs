//! Sample content for a fresh install.

use post_store::Post;

use crate::error::BlogError;
use crate::posts::{CreatePost, PostService};

const SAMPLE_AUTHOR: &str = "Admin";

fn sample(title: &str, content: &str, tags: &[&str], featured: bool) -> CreatePost {
    CreatePost {
        author: Some(SAMPLE_AUTHOR.to_string()),
        status: Some("published".to_string()),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        featured,
        ..CreatePost::new(title, content)
    }
}

#[must_use]
pub fn sample_posts() -> Vec<CreatePost> {
    vec![
        sample(
            "Getting Started with Next.js and MongoDB",
            r#"<h2>Welcome to the Blog!</h2>
<p>Next.js is a powerful React framework for building fast, user-friendly web applications. MongoDB is a flexible, document-based database that pairs perfectly with JavaScript apps.</p>
<h3>Why Next.js?</h3>
<ul>
  <li>Server-side rendering for SEO</li>
  <li>API routes for backend logic</li>
  <li>File-based routing</li>
</ul>
<h3>Connecting to MongoDB</h3>
<p>Use the <code>mongoose</code> library to connect your Next.js app to MongoDB. Store your blog posts, users, and more!</p>
<blockquote>"The best way to get started is to build something!"</blockquote>"#,
            &["Next.js", "MongoDB", "Web Development", "Tutorial"],
            true,
        ),
        sample(
            "Understanding React Hooks: A Comprehensive Guide",
            r#"<h2>React Hooks Demystified</h2>
<p>Hooks let you use state and other React features without writing a class. The most common hooks are <code>useState</code> and <code>useEffect</code>.</p>
<h3>useState Example</h3>
<pre><code>const [count, setCount] = useState(0);</code></pre>
<h3>useEffect Example</h3>
<pre><code>useEffect(() =&gt; &#123; /* side effect */ &#125;, [dependencies]);</code></pre>
<p>Hooks make your components cleaner and easier to test.</p>"#,
            &["React", "JavaScript", "Hooks", "Frontend"],
            false,
        ),
        sample(
            "Building Responsive Layouts with Tailwind CSS",
            r#"<h2>Responsive Design with Tailwind</h2>
<p>Tailwind CSS makes it easy to build responsive layouts using utility classes. Use <code>sm:</code>, <code>md:</code>, <code>lg:</code>, and <code>xl:</code> prefixes for breakpoints.</p>
<ul>
  <li><code>flex flex-col md:flex-row</code> for stacking on mobile, row on desktop</li>
  <li><code>p-4 md:p-8</code> for padding adjustments</li>
</ul>
<p>Try resizing your browser to see the effect!</p>"#,
            &["CSS", "Tailwind", "Responsive Design", "Frontend"],
            true,
        ),
        sample(
            "API Design Best Practices with Node.js",
            r#"<h2>Designing Robust APIs</h2>
<p>Good API design is crucial for maintainable backend systems. Use RESTful conventions, proper status codes, and clear error messages.</p>
<h3>Tips:</h3>
<ul>
  <li>Use nouns for endpoints: <code>/posts</code>, <code>/users</code></li>
  <li>Support filtering, sorting, and pagination</li>
  <li>Document your API with OpenAPI/Swagger</li>
</ul>"#,
            &["Node.js", "API", "Backend", "Best Practices"],
            false,
        ),
        sample(
            "Modern JavaScript Features You Should Know",
            r#"<h2>ES6+ Features</h2>
<p>Modern JavaScript (ES6 and beyond) brings many new features:</p>
<ul>
  <li>Arrow functions: <code>() => {}</code></li>
  <li>Destructuring: <code>const { a, b } = obj;</code></li>
  <li>Template literals: <code>`Hello, ${name}!`</code></li>
  <li>Async/await for promises</li>
  <li>Spread/rest operators</li>
</ul>
<p>Use these features to write cleaner, more concise code!</p>"#,
            &["JavaScript", "ES6", "Modern Development", "Programming"],
            false,
        ),
    ]
}

/// Replaces every post with [`sample_posts`]. Returns the posts in insertion
/// order.
pub fn seed(posts: &PostService) -> Result<Vec<Post>, BlogError> {
    let cleared = posts.clear()?;
    tracing::info!(cleared, "cleared existing posts");

    let created = sample_posts()
        .into_iter()
        .map(|sample| posts.create(sample))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(created = created.len(), "seeded sample posts");
    Ok(created)
}
