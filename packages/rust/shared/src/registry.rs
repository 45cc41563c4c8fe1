//! Closed tag sets used to classify catalog entries.
//!
//! Every family is a plain Rust enum, so matching over tags is exhaustive at
//! compile time. Tags are spelled in lowercase snake_case in record files and
//! in generated document names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Common surface shared by every tag family.
pub trait Category: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Family name used in diagnostics and the exported schema.
    const NAME: &'static str;

    /// Every tag in declaration order.
    const ALL: &'static [Self];

    /// The tag as written in record files.
    fn as_str(&self) -> &'static str;

    /// Exact, case-sensitive lookup.
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.as_str() == value)
    }

    /// All tag spellings, in declaration order.
    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|tag| tag.as_str()).collect()
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl Category for $name {
            const NAME: &'static str = $label;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

category! {
    /// Data modality a system can work with.
    Domain, "domain" {
        Images => "images",
        Nlp => "nlp",
        Tabular => "tabular",
        TimeSeries => "time_series",
    }
}

category! {
    /// Model family a system can produce.
    Technique, "technique" {
        LinearModels => "linear_models",
        Trees => "trees",
        Bayesian => "bayesian",
        KernelMachines => "kernel_machines",
        GraphicalModels => "graphical_models",
        Mlp => "mlp",
        Cnn => "cnn",
        Rnn => "rnn",
        Pretrained => "pretrained",
        Ensembles => "ensembles",
        AdHoc => "ad_hoc",
    }
}

category! {
    /// How knowledge is carried across search runs.
    MetaLearningKind, "meta-learning kind" {
        Portfolio => "portfolio",
        WarmStart => "warm_start",
    }
}

category! {
    /// Learning or preprocessing task a system supports.
    Task, "task" {
        Classification => "classification",
        StructuredPrediction => "structured_prediction",
        StructuredGeneration => "structured_generation",
        UnstructuredGeneration => "unstructured_generation",
        Regression => "regression",
        Clustering => "clustering",
        Imputation => "imputation",
        Segmentation => "segmentation",
        FeaturePreprocessing => "feature_preprocessing",
        FeatureSelection => "feature_selection",
        DataAugmentation => "data_augmentation",
        DimensionalityReduction => "dimensionality_reduction",
        DataPreprocessing => "data_preprocessing",
        DomainPreprocessing => "domain_preprocessing",
    }
}

category! {
    /// Algorithm family used to explore the search space.
    SearchStrategy, "search strategy" {
        Random => "random",
        Evolutionary => "evolutionary",
        GradientDescent => "gradient_descent",
        HillClimbing => "hill_climbing",
        Bayesian => "bayesian",
        Grid => "grid",
        Hyperband => "hyperband",
        ReinforcementLearning => "reinforcement_learning",
        Constructive => "constructive",
        MonteCarlo => "monte_carlo",
    }
}

category! {
    /// Kind of hyperparameter a search space can express.
    HyperparameterKind, "hyperparameter kind" {
        Continuous => "continuous",
        Discrete => "discrete",
        Categorical => "categorical",
        Conditional => "conditional",
    }
}

category! {
    /// Topology of the pipelines a system can discover.
    PipelineShape, "pipeline shape" {
        Single => "single",
        Fixed => "fixed",
        Linear => "linear",
        Graph => "graph",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_exact_match() {
        assert_eq!(Domain::parse("time_series"), Some(Domain::TimeSeries));
        assert_eq!(Domain::parse("Time_Series"), None);
        assert_eq!(Domain::parse(" nlp"), None);
        assert_eq!(SearchStrategy::parse("monte_carlo"), Some(SearchStrategy::MonteCarlo));
    }

    #[test]
    fn every_tag_parses_back() {
        fn check<C: Category>() {
            for tag in C::ALL {
                assert_eq!(C::parse(tag.as_str()), Some(*tag), "{}", C::NAME);
            }
        }
        check::<Domain>();
        check::<Technique>();
        check::<MetaLearningKind>();
        check::<Task>();
        check::<SearchStrategy>();
        check::<HyperparameterKind>();
        check::<PipelineShape>();
    }

    #[test]
    fn family_sizes() {
        assert_eq!(Domain::ALL.len(), 4);
        assert_eq!(Technique::ALL.len(), 11);
        assert_eq!(MetaLearningKind::ALL.len(), 2);
        assert_eq!(Task::ALL.len(), 14);
        assert_eq!(SearchStrategy::ALL.len(), 10);
        assert_eq!(HyperparameterKind::ALL.len(), 4);
        assert_eq!(PipelineShape::ALL.len(), 4);
    }

    #[test]
    fn serde_uses_tag_spelling() {
        let json = serde_json::to_string(&Technique::KernelMachines).expect("serialize");
        assert_eq!(json, "\"kernel_machines\"");
        let parsed: PipelineShape = serde_json::from_str("\"graph\"").expect("deserialize");
        assert_eq!(parsed, PipelineShape::Graph);
        assert_eq!(SearchStrategy::HillClimbing.to_string(), "hill_climbing");
    }
}
