/// Running score for one session; only ever goes up
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    points_per_hit: u32,
    score: u32,
    hits: u32,
}

impl ScoreTracker {
    pub fn new(points_per_hit: u32) -> Self {
        Self {
            points_per_hit,
            score: 0,
            hits: 0,
        }
    }

    pub fn add_hit(&mut self) -> u32 {
        self.hits = self.hits.saturating_add(1);
        self.score = self.score.saturating_add(self.points_per_hit);
        self.score
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }
}
