//! Score tiers, rank badges and the encouragement messages shown after grading.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Picks the feedback message pool. Boundaries: 10 / 8 / 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackTier {
  Perfect,
  Excellent,
  Good,
  NeedsImprovement,
}

impl FeedbackTier {
  pub fn for_score(score: f64) -> Self {
    if score == 10.0 {
      FeedbackTier::Perfect
    } else if score >= 8.0 {
      FeedbackTier::Excellent
    } else if score >= 5.0 {
      FeedbackTier::Good
    } else {
      FeedbackTier::NeedsImprovement
    }
  }

  pub fn messages(self) -> &'static [&'static str] {
    match self {
      FeedbackTier::Perfect => &[
        "Xuất sắc! Em làm đúng tất cả các câu, thật đáng khen!",
        "Tuyệt đối! Em là một nhà toán học nhí tài ba!",
        "Hoàn hảo! Cô giáo chắc chắn sẽ rất tự hào về em!",
        "Mười điểm tròn trĩnh! Hãy giữ vững phong độ này nhé!",
      ],
      FeedbackTier::Excellent => &[
        "Tuyệt vời! Em đã nắm vững kiến thức rất tốt.",
        "Giỏi lắm! Chỉ còn một chút nữa là đạt điểm tối đa rồi.",
        "Rất tốt! Em hãy xem lại các câu sai để hoàn thiện hơn nhé.",
        "Em làm bài rất chắc chắn, cố lên một chút nữa nào!",
      ],
      FeedbackTier::Good => &[
        "Khá lắm! Em đã hiểu bài, hãy luyện thêm một chút nhé.",
        "Em làm được hơn một nửa rồi, cố gắng thêm nào!",
        "Kết quả khá tốt! Xem lại lời giải để tiến bộ hơn nhé.",
        "Em đang đi đúng hướng, chăm chỉ luyện tập thêm nhé!",
      ],
      FeedbackTier::NeedsImprovement => &[
        "Hãy xem lại đáp án chi tiết để rút kinh nghiệm cho lần sau nhé!",
        "Đừng nản lòng! Mỗi lần làm bài là một lần tiến bộ.",
        "Em cần ôn lại bài một chút, lần sau chắc chắn sẽ tốt hơn!",
        "Cố gắng lên nhé! Hãy đọc kỹ đề bài trước khi trả lời.",
      ],
    }
  }
}

/// Badge shown next to the score. Boundaries: 9 / 8 / 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rank {
  Outstanding,
  VeryGood,
  Fair,
  KeepTrying,
}

impl Rank {
  pub fn for_score(score: f64) -> Self {
    if score >= 9.0 {
      Rank::Outstanding
    } else if score >= 8.0 {
      Rank::VeryGood
    } else if score >= 5.0 {
      Rank::Fair
    } else {
      Rank::KeepTrying
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Rank::Outstanding => "Xuất Sắc",
      Rank::VeryGood => "Giỏi",
      Rank::Fair => "Khá",
      Rank::KeepTrying => "Cần Cố Gắng",
    }
  }
}

/// Chooses one message out of a tier's pool.
pub trait MessageChooser {
  fn choose(&mut self, pool: &'static [&'static str]) -> &'static str;
}

/// Production chooser: uniform pick from any RNG.
pub struct RandomChooser<R>(pub R);

impl RandomChooser<rand::rngs::ThreadRng> {
  pub fn thread() -> Self {
    RandomChooser(rand::thread_rng())
  }
}

impl<R: Rng> MessageChooser for RandomChooser<R> {
  fn choose(&mut self, pool: &'static [&'static str]) -> &'static str {
    pool.choose(&mut self.0).copied().unwrap_or_default()
  }
}

/// Deterministic chooser: always the entry at `index` (wrapping).
#[cfg(test)]
pub struct FixedChooser(pub usize);

#[cfg(test)]
impl MessageChooser for FixedChooser {
  fn choose(&mut self, pool: &'static [&'static str]) -> &'static str {
    if pool.is_empty() {
      return "";
    }
    pool[self.0 % pool.len()]
  }
}

/// What the result card shows besides the number.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
  pub tier: FeedbackTier,
  pub rank: Rank,
  pub rank_label: &'static str,
  pub message: &'static str,
}

impl Feedback {
  pub fn for_score(score: f64, chooser: &mut dyn MessageChooser) -> Self {
    let tier = FeedbackTier::for_score(score);
    let rank = Rank::for_score(score);
    Feedback { tier, rank, rank_label: rank.label(), message: chooser.choose(tier.messages()) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn tier_boundaries() {
    assert_eq!(FeedbackTier::for_score(10.0), FeedbackTier::Perfect);
    assert_eq!(FeedbackTier::for_score(9.5), FeedbackTier::Excellent);
    assert_eq!(FeedbackTier::for_score(8.0), FeedbackTier::Excellent);
    assert_eq!(FeedbackTier::for_score(7.9), FeedbackTier::Good);
    assert_eq!(FeedbackTier::for_score(5.0), FeedbackTier::Good);
    assert_eq!(FeedbackTier::for_score(4.9), FeedbackTier::NeedsImprovement);
    assert_eq!(FeedbackTier::for_score(0.0), FeedbackTier::NeedsImprovement);
  }

  #[test]
  fn rank_boundaries() {
    assert_eq!(Rank::for_score(10.0).label(), "Xuất Sắc");
    assert_eq!(Rank::for_score(9.0).label(), "Xuất Sắc");
    assert_eq!(Rank::for_score(8.9).label(), "Giỏi");
    assert_eq!(Rank::for_score(8.0).label(), "Giỏi");
    assert_eq!(Rank::for_score(5.0).label(), "Khá");
    assert_eq!(Rank::for_score(4.99).label(), "Cần Cố Gắng");
  }

  #[test]
  fn rank_and_tier_split_at_nine() {
    let f = Feedback::for_score(9.0, &mut FixedChooser(0));
    assert_eq!(f.rank, Rank::Outstanding);
    assert_eq!(f.tier, FeedbackTier::Excellent);
  }

  #[test]
  fn every_tier_has_enough_messages() {
    for tier in [
      FeedbackTier::Perfect,
      FeedbackTier::Excellent,
      FeedbackTier::Good,
      FeedbackTier::NeedsImprovement,
    ] {
      assert!(tier.messages().len() >= 4, "{tier:?}");
    }
  }

  #[test]
  fn fixed_chooser_is_deterministic() {
    let pool = FeedbackTier::Good.messages();
    assert_eq!(FixedChooser(1).choose(pool), pool[1]);
    assert_eq!(FixedChooser(pool.len() + 2).choose(pool), pool[2]);
  }

  #[test]
  fn random_chooser_stays_in_pool() {
    let mut chooser = RandomChooser(StdRng::seed_from_u64(7));
    let pool = FeedbackTier::Perfect.messages();
    for _ in 0..20 {
      assert!(pool.contains(&chooser.choose(pool)));
    }
  }
}
