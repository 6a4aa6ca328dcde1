//! Advisory text for the `explain` action: a fixed table of topics, looked up
//! by tag or by keyword. Keywords are checked in table order and the first
//! topic with a hit wins; anything unmatched gets the overview.
//!
//! Single-word keywords match whole words only ("this" is not "hi"), so
//! plural forms are listed as keywords of their own.

pub(crate) struct Topic {
    pub tag: &'static str,
    keywords: &'static [&'static str],
    pub text: &'static str,
}

const OVERVIEW: Topic = Topic {
    tag: "overview",
    keywords: &[],
    text: "Topics:\n\
1. security_number: security number s(G) and secure sets\n\
2. apery_set: the Apéry set and its properties\n\
3. edge_rule: how Apéry graph edges are formed\n\
4. graph: Apéry graph structure\n\
5. algorithm: how the security number is computed\n\
6. closed_neighborhood: the closed neighborhood N[X]\n\
7. secure_set: what makes a set secure\n\
8. semigroup: numerical semigroups\n\
9. generators: valid generator input\n\
10. applications: where security numbers are used",
};

const TOPICS: &[Topic] = &[
    Topic {
        tag: "security_number",
        keywords: &["security", "number", "secure set"],
        text: "Security number s(G):\n\
1. The smallest size of a secure set of the graph\n\
2. S' is secure when every X ⊆ S' has |N[X] ∩ S'| ≥ |N[X] \\ S'|\n\
3. A measure of how cheaply the graph can be defended\n\
4. Computed exactly, never approximated",
    },
    Topic {
        tag: "apery_set",
        keywords: &["apéry", "apery", "set", "sets"],
        text: "Apéry set Ap(S, m):\n\
1. For modulus m, one element a_i for every residue i mod m\n\
2. a_i is the smallest member of S congruent to i\n\
3. Its elements are the vertices of the Apéry graph\n\
4. It determines the numerical semigroup",
    },
    Topic {
        tag: "edge_rule",
        keywords: &["edge", "edges", "rule", "rules"],
        text: "Edge rule:\n\
1. Apéry elements a and b are adjacent when |a - b| ∈ S\n\
2. Example: with 3 ∈ S, 4 and 7 are adjacent\n\
3. Every pair is checked once; there are no self-loops",
    },
    Topic {
        tag: "graph",
        keywords: &["graph", "graphs", "structure"],
        text: "Apéry graph:\n\
1. Vertices: the Apéry set\n\
2. Edges: {a, b} with |a - b| ∈ S\n\
3. Undirected and simple\n\
4. Its security number measures how well it can be defended",
    },
    Topic {
        tag: "algorithm",
        keywords: &["algorithm", "algorithms", "compute", "computed", "calculation"],
        text: "Security number algorithm:\n\
1. Candidate sets are tried by increasing size\n\
2. Within a size, candidates follow lexicographic order of vertices\n\
3. Each candidate is tested against every non-empty sub-attack\n\
4. The first secure candidate is returned, so results are reproducible",
    },
    Topic {
        tag: "closed_neighborhood",
        keywords: &["closed neighborhood", "neighborhood", "neighborhoods"],
        text: "Closed neighborhood N[X]:\n\
1. X together with every vertex adjacent to a member of X\n\
2. Used in the security condition |N[X] ∩ S'| ≥ |N[X] \\ S'|",
    },
    Topic {
        tag: "secure_set",
        keywords: &["secure set", "secure sets", "defense"],
        text: "Secure set:\n\
1. Every attack X ⊆ S' meets at least as many defenders as attackers in N[X]\n\
2. Defenders: members of S' in N[X]\n\
3. Attackers: non-members in N[X]",
    },
    Topic {
        tag: "semigroup",
        keywords: &["semigroup", "semigroups", "numerical"],
        text: "Numerical semigroup:\n\
1. A set of non-negative integers closed under addition, containing 0\n\
2. Generated here by coprime positive integers\n\
3. Its complement in the non-negative integers is finite",
    },
    Topic {
        tag: "greeting",
        keywords: &["hi", "hello", "how are you"],
        text: "Hello! Ask about security numbers, Apéry sets, Apéry graphs or numerical semigroups.",
    },
    Topic {
        tag: "generators",
        keywords: &["generator", "generators", "input"],
        text: "Generators:\n\
1. Positive integers such as 3,5 or 4,7,9\n\
2. They should be coprime, otherwise some residue class stays empty\n\
3. The smallest generator is the modulus\n\
4. Search cost grows exponentially with the modulus",
    },
    Topic {
        tag: "applications",
        keywords: &["application", "applications", "use", "practical"],
        text: "Applications:\n\
1. Guard placement in networks\n\
2. Defensive positioning\n\
3. Protection of critical infrastructure",
    },
];

pub(crate) fn resolve(query: Option<&str>) -> &'static Topic {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return &OVERVIEW;
    };
    let query = query.to_lowercase();

    if let Some(topic) = TOPICS.iter().find(|topic| topic.tag == query) {
        return topic;
    }

    let words: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    TOPICS
        .iter()
        .find(|topic| {
            topic.keywords.iter().any(|keyword| {
                if keyword.contains(' ') {
                    query.contains(keyword)
                } else {
                    words.contains(keyword)
                }
            })
        })
        .unwrap_or(&OVERVIEW)
}

pub(crate) fn tags() -> impl Iterator<Item = &'static str> {
    TOPICS.iter().map(|topic| topic.tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tags_resolve_directly() {
        for tag in tags() {
            assert_eq!(resolve(Some(tag)).tag, tag);
        }
    }

    #[test]
    fn keywords_resolve_in_table_order() {
        assert_eq!(resolve(Some("What is a secure set?")).tag, "security_number");
        assert_eq!(resolve(Some("Apéry")).tag, "apery_set");
        assert_eq!(resolve(Some("tell me about defense")).tag, "secure_set");
        assert_eq!(resolve(Some("closed neighborhood")).tag, "closed_neighborhood");
        assert_eq!(resolve(Some("Hello there")).tag, "greeting");
    }

    #[test]
    fn plural_questions_find_their_topic() {
        assert_eq!(resolve(Some("tell me about semigroups")).tag, "semigroup");
        assert_eq!(resolve(Some("how are graphs drawn")).tag, "graph");
        assert_eq!(resolve(Some("which neighborhoods matter")).tag, "closed_neighborhood");
    }

    #[test]
    fn keywords_match_whole_words() {
        // "this" contains "hi" but is not a greeting.
        assert_eq!(resolve(Some("this")).tag, "overview");
    }

    #[test]
    fn missing_or_unknown_queries_get_the_overview() {
        assert_eq!(resolve(None).tag, "overview");
        assert_eq!(resolve(Some("   ")).tag, "overview");
        assert_eq!(resolve(Some("weather")).tag, "overview");
    }
}
