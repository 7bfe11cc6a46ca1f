//! Offline canned answers.
//!
//! Keyword table used when no reply service is reachable. Answers are
//! rendered in the same stream format the service uses, so they go through
//! the demultiplexer like any live reply.

use crate::section::Section;

const FALLBACK_ANSWER: &str =
    "I'd be happy to help you learn more about Jithin's background and expertise!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub section: Section,
    pub answer: &'static str,
    pub keywords: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    topics: Vec<Topic>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            topics: vec![
                Topic {
                    section: Section::Skills,
                    answer: "Jithin is skilled in Python, LangChain, LlamaIndex, RAG, Vector Databases, Node.js, FastAPI, React, Angular, and various AI/ML technologies.",
                    keywords: &[
                        "skills",
                        "technologies",
                        "programming",
                        "languages",
                        "python",
                        "javascript",
                        "react",
                        "angular",
                        "langchain",
                    ],
                },
                Topic {
                    section: Section::Experience,
                    answer: "Jithin works as Associate Consultant at Gapblue Software Labs since 2023, where he engineered scalable backend systems, integrated GPT models with vector databases, and led development of Knowledge Explorer.",
                    keywords: &[
                        "experience",
                        "work",
                        "job",
                        "consultant",
                        "gapblue",
                        "backend",
                        "api",
                        "performance",
                    ],
                },
                Topic {
                    section: Section::Education,
                    answer: "Jithin has an MSc in Computer Science with AI specialization from Cochin University (2021-2023) and BCA from Rajagiri College (2018-2021). His projects include weather prediction systems and e-commerce applications.",
                    keywords: &[
                        "education",
                        "degree",
                        "university",
                        "college",
                        "msc",
                        "bca",
                        "ai",
                        "computer science",
                    ],
                },
                Topic {
                    section: Section::Projects,
                    answer: "Key projects include Knowledge Explorer (multilingual AI search), RAG Pipeline System, Weather Prediction System using hybrid ML models, and scalable backend systems with 40% performance improvement.",
                    keywords: &[
                        "projects",
                        "knowledge explorer",
                        "rag",
                        "weather",
                        "prediction",
                        "backend",
                        "multilingual",
                    ],
                },
            ],
        }
    }
}

impl KnowledgeBase {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// First topic, in table order, with a keyword contained in the query.
    pub fn find_relevant(&self, query: &str) -> Option<&Topic> {
        let query = query.to_lowercase();
        self.topics
            .iter()
            .find(|topic| topic.keywords.iter().any(|kw| query.contains(kw)))
    }

    /// Renders the answer to `query` as a reply stream payload, with a
    /// section marker when a topic matched.
    pub fn respond(&self, query: &str, marker: char) -> String {
        match self.find_relevant(query) {
            Some(topic) => {
                let delim: String = [marker, marker].iter().collect();
                format!("{} {delim}{}{delim}", topic.answer, topic.section.anchor())
            }
            None => FALLBACK_ANSWER.to_string(),
        }
    }
}

/// Splits `text` into chunks of at most `size` characters.
pub fn chunked(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
