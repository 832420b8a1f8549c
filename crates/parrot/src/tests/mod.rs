mod indicator;
