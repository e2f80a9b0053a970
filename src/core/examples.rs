//! Pulls the worked examples out of a puzzle page.
//!
//! Heuristics: the first `<pre><code>` block of a part is its example input,
//! and the last emphasised code span in the part is the example's answer.

use crate::domain::model::{Example, PuzzlePage};
use once_cell::sync::Lazy;
use regex::Regex;

static ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<article class="day-desc">(.*?)</article>"#).expect("regex"));
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<h2[^>]*>--- Day \d+: (.*?) ---</h2>").expect("regex"));
static CODE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<pre><code>(.*?)</code></pre>").expect("regex"));
static ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<code><em>(.*?)</em></code>|<em><code>(.*?)</code></em>").expect("regex")
});
static SUBMITTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Your puzzle answer was <code>(.*?)</code>").expect("regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("regex"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("regex"));

pub fn parse_puzzle_page(html: &str) -> PuzzlePage {
    let articles: Vec<&str> = ARTICLE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();

    let title = TITLE.captures(html).map(|c| to_text(&c[1]));

    let mut examples = Vec::new();
    if let Some(part_one) = articles.first() {
        if let Some(input_data) = first_code_block(part_one) {
            examples.push(Example {
                input_data,
                answer_a: last_answer(part_one),
                answer_b: None,
                extra: None,
            });
        }
    }

    if let Some(part_two) = articles.get(1) {
        let answer_b = last_answer(part_two);
        let first_input = examples.first().map(|e| e.input_data.clone());

        match (first_code_block(part_two), first_input) {
            (Some(input_data), first) if first.as_deref() != Some(input_data.as_str()) => {
                examples.push(Example {
                    input_data,
                    answer_a: None,
                    answer_b,
                    extra: Some("part two example".to_string()),
                });
            }
            (_, Some(_)) => {
                if let Some(first) = examples.first_mut() {
                    first.answer_b = answer_b;
                }
            }
            _ => {}
        }
    }

    let submitted_answers = SUBMITTED
        .captures_iter(html)
        .map(|c| to_text(&c[1]))
        .collect();

    PuzzlePage {
        title,
        examples,
        submitted_answers,
    }
}

fn first_code_block(article: &str) -> Option<String> {
    CODE_BLOCK.captures(article).map(|c| to_text(&c[1]))
}

fn last_answer(article: &str) -> Option<String> {
    ANSWER
        .captures_iter(article)
        .last()
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| to_text(m.as_str()))
        .filter(|answer| !answer.is_empty())
}

/// Strips markup first so that escaped angle brackets survive as text.
fn to_text(fragment: &str) -> String {
    decode_entities(&TAG.replace_all(fragment, ""))
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "amp" => Some('&'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PART_ONE_ONLY: &str = r#"<main>
<article class="day-desc"><h2>--- Day 1: Sonar Sweep ---</h2><p>For example, suppose you had the following report:</p>
<pre><code>199
200
208
</code></pre>
<p>In this example, there are <code><em>7</em></code> measurements that are larger.</p>
</article>
<p>To begin, <a href="1/input" target="_blank">get your puzzle input</a>.</p>
</main>"#;

    const BOTH_PARTS: &str = r#"<main>
<article class="day-desc"><h2>--- Day 5: Supply &amp; Stacks ---</h2>
<p>For example:</p>
<pre><code>    [D]
[N] [C]
move 1 from 2 to 1
</code></pre>
<p>The top crates are <code><em>CMZ</em></code>.</p>
</article>
<p>Your puzzle answer was <code>VQZNJMWTR</code>.</p>
<article class="day-desc"><h2 id="part2">--- Part Two ---</h2>
<p>In the example above, the result is <em><code>MCD</code></em>.</p>
</article>
<p>Your puzzle answer was <code>NLCDCLVMQ</code>.</p>
</main>"#;

    const DIFFERENT_SECOND_EXAMPLE: &str = r#"
<article class="day-desc"><h2>--- Day 1: Trebuchet?! ---</h2>
<pre><code>1abc2
pqr3stu8vwx
</code></pre>
<p>Adding these together produces <code><em>142</em></code>.</p>
</article>
<article class="day-desc"><h2 id="part2">--- Part Two ---</h2>
<pre><code>two1nine
eigh<em>t</em>wothree
</code></pre>
<p>Adding these together produces <code><em>281</em></code>.</p>
</article>"#;

    #[test]
    fn test_part_one_example() {
        let page = parse_puzzle_page(PART_ONE_ONLY);

        assert_eq!(page.title.as_deref(), Some("Sonar Sweep"));
        assert_eq!(page.examples.len(), 1);
        assert_eq!(page.examples[0].input_data, "199\n200\n208\n");
        assert_eq!(page.examples[0].answer_a.as_deref(), Some("7"));
        assert_eq!(page.examples[0].answer_b, None);
        assert!(page.submitted_answers.is_empty());
    }

    #[test]
    fn test_part_two_answer_joins_first_example() {
        let page = parse_puzzle_page(BOTH_PARTS);

        assert_eq!(page.title.as_deref(), Some("Supply & Stacks"));
        assert_eq!(page.examples.len(), 1);
        assert_eq!(page.examples[0].input_data, "    [D]\n[N] [C]\nmove 1 from 2 to 1\n");
        assert_eq!(page.examples[0].answer_a.as_deref(), Some("CMZ"));
        assert_eq!(page.examples[0].answer_b.as_deref(), Some("MCD"));
        assert_eq!(page.submitted_answers, vec!["VQZNJMWTR", "NLCDCLVMQ"]);
    }

    #[test]
    fn test_part_two_with_its_own_example() {
        let page = parse_puzzle_page(DIFFERENT_SECOND_EXAMPLE);

        assert_eq!(page.examples.len(), 2);
        assert_eq!(page.examples[0].answer_a.as_deref(), Some("142"));
        assert_eq!(page.examples[0].answer_b, None);
        assert_eq!(page.examples[1].input_data, "two1nine\neightwothree\n");
        assert_eq!(page.examples[1].answer_b.as_deref(), Some("281"));
        assert_eq!(page.examples[1].extra.as_deref(), Some("part two example"));
    }

    #[test]
    fn test_page_without_articles() {
        let page = parse_puzzle_page("<html><body>Not logged in</body></html>");
        assert_eq!(page, PuzzlePage::default());
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &amp;&amp; c"), "a <b> && c");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&unknown; stays"), "&unknown; stays");
    }

    #[test]
    fn test_escaped_markup_in_example_survives() {
        let html = r#"<article class="day-desc"><pre><code>&lt;em&gt;not a tag&lt;/em&gt;
</code></pre></article>"#;
        let page = parse_puzzle_page(html);
        assert_eq!(page.examples[0].input_data, "<em>not a tag</em>\n");
    }
}
