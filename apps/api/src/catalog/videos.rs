use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

type VideoTable = &'static [(&'static str, &'static [(&'static str, &'static str)])];

/// topic → [(title, url)]
const RESUME_VIDEOS: VideoTable = &[
    (
        "Resume Writing",
        &[
            (
                "How to write a resume",
                "https://www.youtube.com/results?search_query=how+to+write+a+resume",
            ),
            (
                "Writing resume bullet points with metrics",
                "https://www.youtube.com/results?search_query=resume+bullet+points+with+metrics",
            ),
        ],
    ),
    (
        "ATS Optimization",
        &[
            (
                "Making a resume ATS friendly",
                "https://www.youtube.com/results?search_query=ats+friendly+resume",
            ),
            (
                "Matching resume keywords to a job posting",
                "https://www.youtube.com/results?search_query=resume+keywords+job+description",
            ),
        ],
    ),
];

const INTERVIEW_VIDEOS: VideoTable = &[
    (
        "Behavioral Interviews",
        &[
            (
                "Answering with the STAR method",
                "https://www.youtube.com/results?search_query=star+method+interview",
            ),
            (
                "Tell me about yourself",
                "https://www.youtube.com/results?search_query=tell+me+about+yourself+interview+answer",
            ),
        ],
    ),
    (
        "Technical Interviews",
        &[
            (
                "Coding interview preparation",
                "https://www.youtube.com/results?search_query=coding+interview+preparation",
            ),
            (
                "System design interview basics",
                "https://www.youtube.com/results?search_query=system+design+interview+basics",
            ),
        ],
    ),
];

static BUILTIN: Lazy<VideoCatalog> =
    Lazy::new(|| VideoCatalog::from_tables(RESUME_VIDEOS, INTERVIEW_VIDEOS));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTopic {
    pub topic: String,
    pub videos: Vec<Video>,
}

/// Resume and interview tip videos. Not tied to a role: every analysis gets
/// the same set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCatalog {
    pub resume_tips: Vec<VideoTopic>,
    pub interview_tips: Vec<VideoTopic>,
}

impl VideoCatalog {
    pub fn builtin() -> &'static VideoCatalog {
        &BUILTIN
    }

    pub fn from_tables(resume_tips: VideoTable, interview_tips: VideoTable) -> Self {
        Self {
            resume_tips: to_topics(resume_tips),
            interview_tips: to_topics(interview_tips),
        }
    }
}

fn to_topics(table: VideoTable) -> Vec<VideoTopic> {
    table
        .iter()
        .map(|(topic, videos)| VideoTopic {
            topic: topic.to_string(),
            videos: videos
                .iter()
                .map(|(title, url)| Video {
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        })
        .collect()
}
