use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize, Debug)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn single(text: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text }],
            }],
        }
    }
}

structstruck::strike! {
    #[derive(Deserialize, Debug)]
    pub struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<
            #[derive(Deserialize, Debug)]
            pub struct Candidate {
                pub content: Option<
                    #[derive(Deserialize, Debug)]
                    pub struct Content {
                        #[serde(default)]
                        pub parts: Vec<
                            #[derive(Deserialize, Debug)]
                            pub struct Part {
                                pub text: Option<String>,
                            }
                        >,
                    }
                >,
            }
        >,
    }
}

impl GenerateContentResponse {
    pub fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
