//! Embedded A-philic propensity tables (§4.3.4): 256 tetranucleotide and
//! 64 trinucleotide laplace-smoothed log2-odds values, transcribed verbatim
//! from the source's `call_Aphilic.py`-derived constants. These are domain
//! constants, not computed at runtime (§9 design note).

use fnv::FnvHashMap;
use once_cell::sync::Lazy;

/// `(tetranucleotide, log2_odds)` pairs, all 256 combinations of `{A,C,G,T}`.
pub static TETRA_LOG2_RAW: &[(&str, f64)] = &[
    ("CCCC", 4.389556283101704),
    ("GGGG", 4.389556283101704),
    ("TGGG", 4.167163861765255),
    ("GGGC", 3.9041294559314617),
    ("CCCG", 3.9041294559314617),
    ("GCCC", 3.9041294559314617),
    ("CCCT", 3.582201361044099),
    ("GTGC", 3.582201361044099),
    ("AGGG", 3.582201361044099),
    ("TCCC", 3.167163861765255),
    ("CCCA", 3.167163861044099),
    ("CCTA", 2.582201361044099),
    ("TAGG", 2.582201361044099),
    ("CTCC", 2.582201361044099),
    ("CGGG", 2.3191669552103056),
    ("GAGG", 2.1671638617652556),
    ("GGGT", 2.1671638617652556),
    ("GCAC", 1.9972388603229432),
    ("CCAC", 1.9041294559314614),
    ("CCGG", 1.8817616429030073),
    ("GGCC", 1.7077322431279585),
    ("CCTC", 1.5822013610440995),
    ("TCCT", 1.5822013610440995),
    ("GACC", 1.5822013610440993),
    ("CTGT", 1.5822013610440993),
    ("CTCA", 1.5822013610440993),
    ("CCGC", 1.5822013610440993),
    ("TGCC", 1.5822013610440993),
    ("TAAG", 1.5822013610440993),
    ("TACC", 1.3191669552103056),
    ("TCGG", 1.1671638617652556),
    ("CTAG", 1.0967745338738575),
    ("GTGG", 1.0967745338738575),
    ("GTCC", 0.9972388603229432),
    ("CACG", 0.9972388603229432),
    ("GGTC", 0.9972388603229432),
    ("GGTA", 0.9041294559314615),
    ("GTAC", 0.8452357668778931),
    ("TACG", 0.8452357668778931),
    ("GGGA", 0.8452357668778931),
    ("ACGC", 0.7748464389864953),
    ("GCGG", 0.7748464389864953),
    ("CGGC", 0.7342044544891495),
    ("CGGT", 0.7077322431279583),
    ("ACGT", 0.7077322431279583),
    ("CGTA", 0.5822013610440996),
    ("TCTC", 0.5822013610440996),
    ("CCGA", 0.5822013610440996),
    ("GCCG", 0.5822013610440994),
    ("ACCG", 0.5822013610440994),
    ("TCCA", 0.5822013610440991),
    ("CAGT", 0.5822013610440991),
    ("TCCG", 0.5822013610440991),
    ("CACA", 0.5822013610440991),
    ("TCAG", 0.5822013610440991),
    ("CACT", 0.5822013610440991),
    ("TCAA", 0.5822013610440991),
    ("GGTG", 0.5822013610440991),
    ("GTAA", 0.5822013610440991),
    ("GGAG", 0.5822013610440991),
    ("TTGA", 0.5822013610440991),
    ("GGCT", 0.5822013610440991),
    ("GCAG", 0.5822013610440991),
    ("TTAC", 0.5822013610440991),
    ("TGTT", 0.5822013610440991),
    ("ACAG", 0.5822013610440991),
    ("TGTG", 0.5822013610440991),
    ("ACCC", 0.5822013610440991),
    ("ATCC", 0.5822013610440991),
    ("CTTA", 0.5822013610440991),
    ("ACTC", 0.5822013610440991),
    ("AGCC", 0.5822013610440991),
    ("AGTC", 0.5822013610440991),
    ("AGTG", 0.5822013610440991),
    ("ATAC", 0.5822013610440991),
    ("CGTG", 0.41227635960178693),
    ("TGCG", 0.3598089397076514),
    ("GCGC", 0.3598089397076514),
    ("GTAT", 0.26027326615673674),
    ("GTCT", 0.26027326615673674),
    ("GTGT", 0.26027326615673674),
    ("GCCT", 0.26027326615673674),
    ("TACA", 0.26027326615673674),
    ("GGCA", 0.26027326615673674),
    ("AGGC", 0.26027326615673674),
    ("CACC", 0.26027326615673674),
    ("ACAC", 0.26027326615673674),
    ("TCTG", 0.26027326615673674),
    ("TGAC", 0.26027326615673674),
    ("CGCA", 0.1671638617652555),
    ("GCGT", 0.09677453387385747),
    ("CATG", 0.09677453387385747),
    ("CAGA", -0.00276114),
    ("ACTG", -0.00276114),
    ("ATCA", -0.00276114),
    ("TGCA", -0.00276114),
    ("TGTA", -0.00276114),
    ("CTAC", -0.00276114),
    ("TGGC", -0.00276114),
    ("GGTT", -0.00276114),
    ("TTTA", -0.00276114),
    ("AGTA", -0.00276114),
    ("TAAA", -0.00276114),
    ("GTTG", -0.00276114),
    ("AGGA", -0.00276114),
    ("CTGC", -0.00276114),
    ("TGTC", -0.00276114),
    ("TCAC", -0.00276114),
    ("GATC", -0.00276114),
    ("AACC", -0.00276114),
    ("ATGG", -0.00276114),
    ("ACCT", -0.00276114),
    ("AGGT", -0.00276114),
    ("TACT", -0.00276114),
    ("TTAG", -0.00276114),
    ("TGAA", -0.00276114),
    ("AAGT", -0.00276114),
    ("TAGT", -0.00276114),
    ("AACT", -0.00276114),
    ("TATT", -0.00276114),
    ("GGAC", -0.00276114),
    ("CAAC", -0.00276114),
    ("ATGC", -0.154764233),
    ("CCAT", -0.225153561),
    ("CGCC", -0.225153561),
    ("GTTC", -0.417798639),
    ("AAGC", -0.417798639),
    ("CTGA", -0.417798639),
    ("AATC", -0.417798639),
    ("AATA", -0.417798639),
    ("CGAC", -0.417798639),
    ("AAGG", -0.417798639),
    ("CCTT", -0.417798639),
    ("ACGA", -0.417798639),
    ("TTCA", -0.417798639),
    ("GCTC", -0.417798639),
    ("AACA", -0.417798639),
    ("GGCG", -0.417798639),
    ("TCAT", -0.417798639),
    ("GGAT", -0.417798639),
    ("ATGT", -0.417798639),
    ("ACCA", -0.417798639),
    ("ATGA", -0.417798639),
    ("CTTT", -0.417798639),
    ("AGCA", -0.417798639),
    ("CTAT", -0.417798639),
    ("GTCG", -0.417798639),
    ("GACA", -0.417798639),
    ("TGAG", -0.417798639),
    ("AGAC", -0.417798639),
    ("TGGT", -0.417798639),
    ("ACTT", -0.417798639),
    ("ATAA", -0.417798639),
    ("GAGC", -0.417798639),
    ("AGTT", -0.417798639),
    ("TAAC", -0.417798639),
    ("TGAT", -0.417798639),
    ("TGCT", -0.417798639),
    ("GCAT", -0.533275856),
    ("CCGT", -0.58772364),
    ("TTGG", -0.739726734),
    ("TTAT", -0.739726734),
    ("TCGC", -0.739726734),
    ("TAGA", -0.739726734),
    ("CTTG", -0.739726734),
    ("TTGT", -0.739726734),
    ("GCTT", -0.739726734),
    ("AGCG", -0.739726734),
    ("AAAG", -0.739726734),
    ("ACAT", -0.739726734),
    ("CAGC", -0.739726734),
    ("GAAC", -0.739726734),
    ("CATC", -0.739726734),
    ("CATT", -0.739726734),
    ("GAGT", -0.739726734),
    ("CGGA", -0.739726734),
    ("ATCT", -0.739726734),
    ("CCTG", -0.739726734),
    ("ACTA", -0.739726734),
    ("AGAT", -1.00276114),
    ("AATG", -1.00276114),
    ("CTAA", -1.00276114),
    ("CGAG", -1.00276114),
    ("CCAG", -1.00276114),
    ("CTCT", -1.00276114),
    ("CATA", -1.00276114),
    ("CAAG", -1.00276114),
    ("CTCG", -1.00276114),
    ("TCGT", -1.00276114),
    ("TTGC", -1.00276114),
    ("AGAG", -1.00276114),
    ("GATT", -1.00276114),
    ("GATG", -1.00276114),
    ("ATAG", -1.00276114),
    ("GACT", -1.00276114),
    ("GTGA", -1.00276114),
    ("GTTA", -1.00276114),
    ("TTCT", -1.00276114),
    ("CGCG", -1.080763652),
    ("ATCG", -1.118238357),
    ("TATA", -1.118238357),
    ("TTTG", -1.225153561),
    ("TTCC", -1.225153561),
    ("ACGG", -1.225153561),
    ("AGCT", -1.225153561),
    ("GCCA", -1.225153561),
    ("ACAA", -1.225153561),
    ("TCTT", -1.225153561),
    ("CAGG", -1.225153561),
    ("TCTA", -1.225153561),
    ("AAGA", -1.225153561),
    ("CGAT", -1.225153561),
    ("GTAG", -1.225153561),
    ("TATG", -1.225153561),
    ("GTCA", -1.225153561),
    ("CGCT", -1.225153561),
    ("AGAA", -1.225153561),
    ("CTGG", -1.225153561),
    ("TTTC", -1.417798639),
    ("ATTA", -1.417798639),
    ("CCAA", -1.417798639),
    ("TATC", -1.417798639),
    ("GAAG", -1.417798639),
    ("GACG", -1.417798639),
    ("GAGA", -1.417798639),
    ("GCTG", -1.417798639),
    ("TGGA", -1.417798639),
    ("TTAA", -1.58772364),
    ("GTTT", -1.58772364),
    ("CTTC", -1.58772364),
    ("GATA", -1.58772364),
    ("GCTA", -1.58772364),
    ("TTCG", -1.739726734),
    ("GAAA", -1.739726734),
    ("TCGA", -1.739726734),
    ("CAAT", -1.739726734),
    ("TAGC", -1.739726734),
    ("AAAC", -1.739726734),
    ("TAAT", -1.877230258),
    ("CGTC", -1.877230258),
    ("ATTT", -2.00276114),
    ("CGAA", -2.00276114),
    ("ATTG", -2.00276114),
    ("AACG", -2.00276114),
    ("GCAA", -2.00276114),
    ("AAAT", -2.118238357),
    ("CAAA", -2.118238357),
    ("GCGA", -2.118238357),
    ("ATTC", -2.225153561),
    ("GAAT", -2.324689235),
    ("CGTT", -2.324689235),
    ("GGAA", -2.324689235),
    ("AAAA", -2.417798639),
    ("ATAT", -2.417798639),
    ("TTTT", -2.50526148),
    ("AATT", -3.50526148)
];

/// `(trinucleotide, log2_odds)` pairs, all 64 combinations of `{A,C,G,T}`.
pub static TRI_LOG2_RAW: &[(&str, f64)] = &[
    ("CCC", 4.781079142726248),
    ("GGG", 3.9737242206686436),
    ("CAC", 1.6656019253063112),
    ("GCC", 1.557077468528142),
    ("GGC", 1.557077468528142),
    ("CCG", 1.4526082019721132),
    ("GTG", 1.2505644260274673),
    ("ACC", 1.2326425180302052),
    ("CCT", 1.1737488289766367),
    ("GGT", 1.1546400060289317),
    ("CGG", 1.0806394245851554),
    ("AGG", 1.080639424585155),
    ("TAC", 0.9811037510342406),
    ("TCC", 0.8582470032487074),
    ("GTA", 0.7810791427262473),
    ("CTC", 0.5952125974149134),
    ("TGC", 0.5660662517553969),
    ("CCA", 0.303031845921603),
    ("GTC", 0.2732845025275512),
    ("TGG", 0.1875546285016671),
    ("CTA", 0.1420399692492986),
    ("TAG", 0.08063942458515531),
    ("ACG", 0.04111106039851759),
    ("GCA", 0.030013351515187126),
    ("GAC", 0.010250096693757146),
    ("GCG", -0.023697235),
    ("CGT", -0.074638801),
    ("CGC", -0.141752997),
    ("CAT", -0.551628791),
    ("TCT", -0.563216765),
    ("ATG", -0.597432481),
    ("TGT", -0.619800294),
    ("GAG", -0.65632617),
    ("CAG", -0.726715497),
    ("TGA", -0.726715497),
    ("GGA", -0.873556886),
    ("ATC", -0.919360575),
    ("ACA", -1.006823417),
    ("CTG", -1.089285577),
    ("GAT", -1.24128867),
    ("AGT", -1.24128867),
    ("ACT", -1.378792194),
    ("TCA", -1.504323076),
    ("TCG", -1.54385144),
    ("CGA", -1.619800294),
    ("TAT", -1.726715497),
    ("ATA", -1.777341571),
    ("TTA", -2.006823417),
    ("AAG", -2.006823417),
    ("TAA", -2.089285577),
    ("CTT", -2.167288089),
    ("AGC", -2.24128867),
    ("AGA", -2.311677998),
    ("AAC", -2.378792194),
    ("GTT", -2.378792194),
    ("TTG", -2.504323076),
    ("GCT", -2.504323076),
    ("CAA", -2.777341571),
    ("TTC", -2.919360575),
    ("GAA", -3.128813941),
    ("TTT", -3.204762794),
    ("AAA", -3.311677998),
    ("ATT", -3.411213672),
    ("AAT", -3.473949427)
];

static TETRA_LOG2: Lazy<FnvHashMap<&'static str, f64>> =
    Lazy::new(|| TETRA_LOG2_RAW.iter().copied().collect());

static TRI_LOG2: Lazy<FnvHashMap<&'static str, f64>> =
    Lazy::new(|| TRI_LOG2_RAW.iter().copied().collect());

/// Population mean and standard deviation of the trinucleotide table,
/// used by the auto nucleation threshold (§4.3.4).
static TRI_POPULATION_STATS: Lazy<(f64, f64)> = Lazy::new(|| {
    let values: Vec<f64> = TRI_LOG2_RAW.iter().map(|(_, v)| *v).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
});

/// Looks up a tetranucleotide's log2-odds score; `0.0` for any 4-mer not in
/// the table (N-containing windows, guarded but should not occur over
/// `{A,C,G,T}` input).
pub fn tetra_score(tetra: &str) -> f64 {
    TETRA_LOG2.get(tetra).copied().unwrap_or(0.0)
}

/// Looks up a trinucleotide's log2-odds score; `0.0` for any 3-mer not in
/// the table.
pub fn tri_score(tri: &str) -> f64 {
    TRI_LOG2.get(tri).copied().unwrap_or(0.0)
}

/// `(mean, std)` of the 64 trinucleotide log2-odds values, used to compute
/// the auto nucleation threshold `mean*3 + factor*std*sqrt(3)`.
pub fn tri_population_stats() -> (f64, f64) {
    *TRI_POPULATION_STATS
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(TETRA_LOG2_RAW.len(), 256);
        assert_eq!(TRI_LOG2_RAW.len(), 64);
    }

    #[test]
    fn test_known_scores() {
        assert!((tetra_score("CCCC") - 4.389556283101704).abs() < 1e-9);
        assert!((tri_score("CCC") - 4.781079142726248).abs() < 1e-9);
        assert_eq!(tetra_score("NNNN"), 0.0);
    }

    #[test]
    fn test_population_stats_sane() {
        let (mean, std) = tri_population_stats();
        assert!(mean.is_finite() && std > 0.0);
    }
}
