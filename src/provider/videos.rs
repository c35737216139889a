//! Keyword-matched YouTube recommendations.
//!
//! The pick is seeded from the topic and title, so the same module always
//! gets the same video while different modules on one subject get variety.

use crate::learning::VideoLink;

struct Shelf {
    keywords: &'static [&'static str],
    label: &'static str,
    ids: [&'static str; 5],
    minutes: (u64, u64),
}

const fn shelf(
    keywords: &'static [&'static str],
    label: &'static str,
    ids: [&'static str; 5],
    minutes: (u64, u64),
) -> Shelf {
    Shelf {
        keywords,
        label,
        ids,
        minutes,
    }
}

const PROGRAMMING: &[&str] = &[
    "python", "programming", "code", "algorithm", "data structure", "heap", "stack", "queue",
    "tree", "graph", "array", "sorting", "search",
];

/// Narrower shelves inside programming, checked in order.
static PROGRAMMING_SHELVES: &[Shelf] = &[
    shelf(&["list", "array"], "Python Lists & Arrays", ["W6NZfCO5SIk", "rfscVS0vtbw", "JJmcL1N2KQs", "Tn6-PIqc4UM", "hdI2bqOjy3c"], (10, 25)),
    shelf(&["function"], "Python Functions", ["PkZNo7MFNFg", "Tn6-PIqc4UM", "SqcY0GlETPk", "DLX62G4lc44", "TlB_eWDSMt4"], (12, 30)),
    shelf(&["heap"], "Heap Data Structure", ["t0Cq6tVNRBA", "HqPJF2L5h9U", "B7hVxCmfPtM", "WCm3TqScBM8", "AE5I0xACpZs"], (15, 35)),
    shelf(&["stack"], "Stack Data Structure", ["wptevk0bshY", "F1F2imiOJfk", "KJYfzFnVfn8", "O1KeXo8lE8A", "78m2-VsZSG4"], (15, 35)),
    shelf(&["queue"], "Queue Data Structure", ["6JxvKfSV9Ns", "zp6pBNbUB2U", "D6gu-_tmEpQ", "A5_XdiK4J8A", "okr-XE8yTO8"], (15, 35)),
    shelf(&["tree"], "Tree Data Structure", ["RBSGKlAvoiM", "1-l_UOFi1Xw", "76dhtgZt38A", "IpyCqRmaKW4", "ZM-sV9zQPEs"], (15, 35)),
    shelf(&["graph"], "Graph Data Structure", ["09_LlHjoEiY", "tWVWeAqZ0WU", "zaBhtODEL0w", "pcKY4hjDrxk", "AfYqN3fGapc"], (15, 35)),
    shelf(&["algorithm", "sorting", "search", "dynamic programming"], "Algorithms", ["KEEKn7Me-ms", "l7-f9gS8VuE", "WaNLJf8xzC4", "oBt53YbR9Kk", "P5Uv_DAHdwg"], (18, 40)),
    shelf(&[""], "Programming", ["fBNz5xF-Kx4", "Oe421EPjeBE", "TlB_eWDSMt4", "KEEKn7Me-ms", "t0Cq6tVNRBA"], (15, 35)),
];

static SUBJECT_SHELVES: &[Shelf] = &[
    shelf(&["hook"], "React Hooks", ["O6P86uwfdR0", "dpw9EHDh2bM", "TNhaISOUy6Q", "f687hBjwFcM", "35lXWvCuM8o"], (18, 28)),
    shelf(&["component"], "React Components", ["Tn6-PIqc4UM", "SqcY0GlETPk", "DLX62G4lc44", "w7ejDZ8SWv8", "Ke90Tje7VS0"], (20, 35)),
    shelf(&["javascript", "react", "js", "web"], "JavaScript", ["PkZNo7MFNFg", "hdI2bqOjy3c", "W6NZfCO5SIk", "jS4aFq5-91M", "SBmSRK3feww"], (14, 25)),
    shelf(&["math", "science", "physics", "chemistry", "biology"], "Science & Math", ["WUvTyaaNkzM", "fNk_zzaMoSs", "kCc8FmEb1nY", "YQHsXMglC9A", "3AtDnEC4zak"], (16, 30)),
    shelf(&["language", "english", "literature", "writing", "grammar"], "Language Learning", ["VuEQzZAEydw", "3AtDnEC4zak", "kCc8FmEb1nY", "YQHsXMglC9A", "fNk_zzaMoSs"], (12, 22)),
    shelf(&["history", "geography", "social", "politics", "culture"], "History & Culture", ["TlB_eWDSMt4", "fBNz5xF-Kx4", "Oe421EPjeBE", "qZXt1Aom3Cs", "nhBVL41-_Cw"], (18, 32)),
    shelf(&["art", "music", "design", "creative", "draw", "paint"], "Arts & Creativity", ["5LYrN_cAJoA", "O6P86uwfdR0", "dpw9EHDh2bM", "TNhaISOUy6Q", "f687hBjwFcM"], (15, 28)),
    shelf(&["business", "economics", "finance", "marketing", "management"], "Business & Finance", ["35lXWvCuM8o", "w7ejDZ8SWv8", "Ke90Tje7VS0", "jS4aFq5-91M", "SBmSRK3feww"], (20, 35)),
    shelf(&["health", "fitness", "medicine", "nutrition", "exercise"], "Health & Wellness", ["WUvTyaaNkzM", "fNk_zzaMoSs", "kCc8FmEb1nY", "YQHsXMglC9A", "3AtDnEC4zak"], (12, 25)),
    shelf(&["cooking", "food", "recipe", "lifestyle", "hobby"], "Cooking & Lifestyle", ["VuEQzZAEydw", "3AtDnEC4zak", "kCc8FmEb1nY", "YQHsXMglC9A", "fNk_zzaMoSs"], (10, 20)),
];

static GENERAL: Shelf = shelf(&[], "Learn About", ["TlB_eWDSMt4", "fBNz5xF-Kx4", "Oe421EPjeBE", "qZXt1Aom3Cs", "nhBVL41-_Cw"], (15, 30));

/// FNV-1a; stable across builds and platforms, unlike `DefaultHasher`.
fn seed(topic: &str, title: &str) -> u64 {
    format!("{}_{}", topic.to_lowercase(), title.to_lowercase())
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, b| {
            (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
}

fn matches(shelf: &Shelf, topic: &str) -> bool {
    shelf.keywords.iter().any(|k| topic.contains(k))
}

fn pick_shelf(topic: &str) -> &'static Shelf {
    if PROGRAMMING.iter().any(|k| topic.contains(k)) {
        return PROGRAMMING_SHELVES
            .iter()
            .find(|s| matches(s, topic))
            .unwrap_or(&GENERAL);
    }
    // hooks and components only count on web topics
    let web = ["javascript", "react", "js", "web"]
        .iter()
        .any(|k| topic.contains(k));
    SUBJECT_SHELVES
        .iter()
        .filter(|s| web || !s.keywords.iter().any(|k| *k == "hook" || *k == "component"))
        .find(|s| matches(s, topic))
        .unwrap_or(&GENERAL)
}

/// Videos attached to a freshly generated module.
pub const MODULE_VIDEOS: usize = 1;

/// Most videos a single recommendation returns; one per shelf id.
pub const MAX_VIDEOS: usize = 5;

/// Up to `count` distinct videos for `topic`, seeded with `title`.
///
/// The same arguments always yield the same links.
pub fn recommend(topic: &str, title: &str, count: usize) -> Vec<VideoLink> {
    let shelf = pick_shelf(&topic.to_lowercase());
    let seed = seed(topic, title);
    let start = (seed % shelf.ids.len() as u64) as usize;
    let (lo, hi) = shelf.minutes;

    (0..count.min(shelf.ids.len()))
        .map(|n| {
            let id = shelf.ids[(start + n) % shelf.ids.len()];
            let mixed = seed.rotate_left(8 * n as u32);
            let minutes = lo + (mixed >> 16) % (hi - lo + 1);
            let seconds = 10 + (mixed >> 32) % 50;
            let title = match n {
                0 => format!("{} - {title}", shelf.label),
                n => format!("{} - {title} (part {})", shelf.label, n + 1),
            };

            VideoLink {
                title,
                url: format!("https://www.youtube.com/watch?v={id}"),
                thumbnail: format!("https://i.ytimg.com/vi/{id}/maxresdefault.jpg"),
                duration: format!("{minutes}:{seconds:02}"),
            }
        })
        .collect()
}
