use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Short uppercase words that look like tickers but aren't: common English
/// words, finance abbreviations, calendar tokens and WSB slang. The bare
/// ticker pattern is noisy and this set suppresses its false positives.
static FALSE_POSITIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "I", "A", "AM", "AN", "AT", "BE", "BY", "DO", "GO", "IF", "IN", "IS",
        "IT", "ME", "MY", "NO", "OF", "OK", "ON", "OR", "SO", "TO", "UP", "US",
        "WE", "CEO", "CFO", "CTO", "COO", "IPO", "ETF", "SEC", "FDA", "FED",
        "GDP", "ATH", "DD", "DFV", "EPS", "EOD", "ERR", "EST", "FOR", "FYI",
        "GG", "HQ", "IMO", "LOL", "NYC", "OTC", "PDT", "PE", "PM", "PT",
        "RH", "SP", "TD", "UK", "USA", "WSB", "YOLO", "FOMO", "HODL", "MOON",
        "APE", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
        "JAN", "FEB", "MAR", "MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN",
        "THE", "AND", "BUT", "NOT", "ALL", "ANY", "ARE", "CAN", "DAY", "DID",
        "GET", "GOT", "HAS", "HAD", "HER", "HIM", "HIS", "HOW", "ITS", "LET",
        "MAD", "MAN", "MEN", "NEW", "NOW", "OLD", "ONE", "OUR", "OUT", "OWN",
        "PUT", "RAN", "RED", "RUN", "SAW", "SAY", "SHE", "TOO", "TOP",
        "TRY", "TWO", "WAR", "WAS", "WAY", "WHO", "WHY", "WIN", "WON", "YET",
        "YOU", "BIG", "LOW", "HIGH", "CALL", "PUTS", "LONG", "SHORT", "BULL",
        "BEAR", "HOLD", "SELL", "BUY", "GAIN", "LOSS", "PUMP", "DUMP", "CASH",
        "DEBT", "RISK", "SAFE", "EDIT", "TLDR", "OP", "LMAO", "ROPE", "RIP",
        "BANG", "OG", "AI", "EV", "GOOD", "BAD", "BEST", "LIKE", "JUST", "EVEN",
        "OVER", "MOST", "MUCH", "NEXT", "ONLY", "VERY", "WELL", "ALSO", "BACK",
        "BEEN", "COME", "DOWN", "EACH", "FIND", "GIVE", "HAVE", "HERE", "KEEP",
        "LAST", "LOOK", "MADE", "MAKE", "MANY", "MORE", "MOVE", "MUST", "NAME",
        "NEED", "OPEN", "PART", "PLAY", "REAL", "SAID", "SAME", "SOME", "SURE",
        "TAKE", "TELL", "THAN", "THAT", "THEM", "THEN", "THEY", "THIS", "TIME",
        "TURN", "WANT", "WEEK", "WENT", "WERE", "WHAT", "WHEN", "WILL", "WITH",
        "WORK", "YEAR", "YOUR", "FREE", "HUGE", "HARD", "ZERO", "LMFAO",
        "COST", "FROM", "DOES", "DONE", "FULL", "HALF", "HELP", "HOME", "INTO",
        "LEFT", "LESS", "LIFE", "LINE", "LIST", "LIVE", "LOST", "MARK",
        "MISS", "OWE", "PAYS", "POST", "REST", "RICH", "RISE", "SAVE", "SIDE",
        "SIZE", "STOP", "TALK", "TERM", "TILL", "TRUE", "TYPE", "USED",
        "WAIT", "WAKE", "WALL", "WISH", "WORD", "YALL", "HOLY", "SHIT",
    ]
    .into_iter()
    .collect()
});

/// True when `word` is a known non-ticker and must be suppressed
pub fn is_false_positive(word: &str) -> bool {
    FALSE_POSITIVES.contains(word)
}
